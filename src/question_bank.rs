use std::collections::HashSet;

use log::{debug, info};
use rand::seq::SliceRandom;

use crate::models::ExperienceLevel;

/// Static catalog entry. Immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub text: &'static str,
    pub category: &'static str,
    pub difficulty: u8,
    pub expected_answer: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Basic,
    Intermediate,
    Advanced,
}

/// Fixed, tiered catalog of Excel interview questions. Selection is uniform
/// within the difficulty pool; no weighting by category or prior answers.
/// No-repeat tracking is per session: callers pass the session's used-set.
pub struct QuestionBank {
    entries: Vec<(Tier, CatalogEntry)>,
}

impl QuestionBank {
    /// The compiled-in Excel question set.
    pub fn builtin() -> Self {
        let bank = Self::from_tiers(BASIC, INTERMEDIATE, ADVANCED);
        info!("Question bank initialized with {} questions", bank.len());
        bank
    }

    pub fn from_tiers(
        basic: &[CatalogEntry],
        intermediate: &[CatalogEntry],
        advanced: &[CatalogEntry],
    ) -> Self {
        let mut entries = Vec::new();
        for entry in basic {
            entries.push((Tier::Basic, entry.clone()));
        }
        for entry in intermediate {
            entries.push((Tier::Intermediate, entry.clone()));
        }
        for entry in advanced {
            entries.push((Tier::Advanced, entry.clone()));
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Picks the opening question uniformly from the tier matching the
    /// declared experience level and marks it used. `None` only if that
    /// tier has no entries at all.
    pub fn first_question(
        &self,
        level: ExperienceLevel,
        used: &mut HashSet<usize>,
    ) -> Option<&CatalogEntry> {
        let tier = match level {
            ExperienceLevel::Beginner => Tier::Basic,
            ExperienceLevel::Intermediate => Tier::Intermediate,
            ExperienceLevel::Advanced => Tier::Advanced,
        };
        let pool: Vec<usize> = self.tier_indices(&[tier]);
        self.pick(&pool, used)
    }

    /// Picks the next question for the requested difficulty, skipping
    /// entries this session has already seen. An exhausted pool clears the
    /// session's used-set and retries the full pool; `None` is returned
    /// only when the pool itself is empty (catalog misconfiguration) and
    /// tells the caller to end the interview.
    pub fn next_question(
        &self,
        difficulty: u8,
        category: &str,
        used: &mut HashSet<usize>,
    ) -> Option<&CatalogEntry> {
        debug!(
            "Selecting next question at difficulty {} (previous category: {})",
            difficulty, category
        );
        let tiers: &[Tier] = match difficulty {
            0..=2 => &[Tier::Basic, Tier::Intermediate],
            3 => &[Tier::Intermediate, Tier::Advanced],
            _ => &[Tier::Advanced],
        };
        let pool = self.tier_indices(tiers);

        let available: Vec<usize> = pool
            .iter()
            .copied()
            .filter(|idx| !used.contains(idx))
            .collect();

        if available.is_empty() {
            debug!("Question pool exhausted - resetting used-set");
            used.clear();
            return self.pick(&pool, used);
        }
        self.pick(&available, used)
    }

    fn tier_indices(&self, tiers: &[Tier]) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, (tier, _))| tiers.contains(tier))
            .map(|(idx, _)| idx)
            .collect()
    }

    fn pick(&self, pool: &[usize], used: &mut HashSet<usize>) -> Option<&CatalogEntry> {
        let idx = *pool.choose(&mut rand::thread_rng())?;
        used.insert(idx);
        Some(&self.entries[idx].1)
    }
}

const BASIC: &[CatalogEntry] = &[
    CatalogEntry {
        text: "What is the difference between a formula and a function in Excel?",
        category: "Basic Concepts",
        difficulty: 1,
        expected_answer: "A formula is an expression that calculates values, while a function is a predefined formula that performs specific calculations like SUM, AVERAGE, etc.",
    },
    CatalogEntry {
        text: "How do you freeze panes in Excel and why would you use this feature?",
        category: "Basic Features",
        difficulty: 1,
        expected_answer: "Go to View tab > Freeze Panes. This keeps certain rows or columns visible while scrolling, useful for keeping headers visible in large datasets.",
    },
    CatalogEntry {
        text: "Explain the difference between relative and absolute cell references.",
        category: "Basic Concepts",
        difficulty: 2,
        expected_answer: "Relative references (A1) change when copied to other cells. Absolute references ($A$1) stay fixed. Mixed references ($A1 or A$1) fix either row or column.",
    },
    CatalogEntry {
        text: "How do you create a simple sum formula for the range A1 to A10?",
        category: "Basic Formulas",
        difficulty: 1,
        expected_answer: "Use =SUM(A1:A10) to add all values in cells A1 through A10.",
    },
];

const INTERMEDIATE: &[CatalogEntry] = &[
    CatalogEntry {
        text: "How would you use VLOOKUP to find data from another table?",
        category: "Functions",
        difficulty: 2,
        expected_answer: "VLOOKUP(lookup_value, table_array, col_index_num, FALSE) searches for a value in the first column and returns a value from a specified column to the right.",
    },
    CatalogEntry {
        text: "What is the difference between VLOOKUP and INDEX/MATCH?",
        category: "Functions",
        difficulty: 3,
        expected_answer: "INDEX/MATCH is more flexible than VLOOKUP - it can look left, handles column insertions better, and is generally faster for large datasets.",
    },
    CatalogEntry {
        text: "How do you create and use named ranges in Excel?",
        category: "Advanced Features",
        difficulty: 2,
        expected_answer: "Select cells, go to Formulas tab > Define Name. Named ranges make formulas more readable and easier to maintain.",
    },
];

const ADVANCED: &[CatalogEntry] = &[
    CatalogEntry {
        text: "Explain how pivot tables work and when you would use them.",
        category: "Data Analysis",
        difficulty: 3,
        expected_answer: "Pivot tables summarize, analyze, and present data. They're used for data analysis, creating reports, and finding patterns in large datasets.",
    },
    CatalogEntry {
        text: "How would you use array formulas in Excel?",
        category: "Advanced Functions",
        difficulty: 4,
        expected_answer: "Array formulas perform calculations on arrays of data. Enter with Ctrl+Shift+Enter. Useful for complex calculations across multiple cells or ranges.",
    },
    CatalogEntry {
        text: "What are some ways to optimize Excel performance with large datasets?",
        category: "Performance",
        difficulty: 4,
        expected_answer: "Use efficient functions, avoid volatile functions, minimize array formulas, use tables instead of ranges, and consider Power Query for data transformation.",
    },
];
