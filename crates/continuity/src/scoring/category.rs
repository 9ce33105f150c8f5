//! Keyword buckets used to classify job titles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Job title category, in rank order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobCategory {
    /// Research roles.
    Research,
    /// AI and machine learning roles.
    AiMl,
    /// Internships and summer positions.
    Internship,
    /// General engineering roles.
    Engineer,
}

impl JobCategory {
    /// All categories in rank order.
    #[must_use]
    pub fn all() -> &'static [JobCategory] {
        &[
            JobCategory::Research,
            JobCategory::AiMl,
            JobCategory::Internship,
            JobCategory::Engineer,
        ]
    }

    /// Rank contributed to a job's score; lower ranks first.
    #[must_use]
    pub fn rank(&self) -> u8 {
        match self {
            JobCategory::Research => 1,
            JobCategory::AiMl => 2,
            JobCategory::Internship => 3,
            JobCategory::Engineer => 4,
        }
    }
}

impl fmt::Display for JobCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobCategory::Research => "Research",
            JobCategory::AiMl => "AI/ML",
            JobCategory::Internship => "Internship",
            JobCategory::Engineer => "Engineer",
        };
        write!(f, "{s}")
    }
}

/// The four ordered keyword lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobKeywords {
    pub research: Vec<String>,
    pub ai_ml: Vec<String>,
    pub internship: Vec<String>,
    pub engineer: Vec<String>,
}

impl Default for JobKeywords {
    fn default() -> Self {
        Self {
            research: owned(&["Research", "Researcher", "Research Scientist"]),
            ai_ml: owned(&[
                "AI",
                "Machine Learning",
                "Deep Learning",
                "ML Engineer",
                "AI Engineer",
            ]),
            internship: owned(&["Internship", "Intern", "Summer"]),
            engineer: owned(&["Engineer", "Developer", "Software"]),
        }
    }
}

impl JobKeywords {
    /// Keywords of one bucket.
    #[must_use]
    pub fn bucket(&self, category: JobCategory) -> &[String] {
        match category {
            JobCategory::Research => &self.research,
            JobCategory::AiMl => &self.ai_ml,
            JobCategory::Internship => &self.internship,
            JobCategory::Engineer => &self.engineer,
        }
    }

    /// First bucket with a keyword contained in `title` (case-insensitive).
    #[must_use]
    pub fn classify(&self, title: &str) -> Option<JobCategory> {
        let title = title.to_lowercase();
        JobCategory::all().iter().copied().find(|&category| {
            self.bucket(category)
                .iter()
                .filter(|k| !k.is_empty())
                .any(|k| title.contains(&k.to_lowercase()))
        })
    }

    /// Total number of keywords across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        JobCategory::all().iter().map(|c| self.bucket(*c).len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}
