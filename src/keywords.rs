use crate::models::Job;

pub const LEGAL_KEYWORDS: &[&str] = &[
    "attorney",
    "lawyer",
    "legal",
    "counsel",
    "litigation",
    "law firm",
    "paralegal",
    "esquire",
    "prosecution",
    "defense",
    "trial",
    "court",
    "judicial",
    "compliance",
    "regulatory",
    "civil",
    "criminal",
    "intellectual property",
    "legal research",
    "legal advisor",
];

pub const BLACKLIST_KEYWORDS: &[&str] = &[
    "secretary",
    "paralegal",
    "assistant",
    "therapist",
    "counselor",
    "conseling",
];

/// Two-list substring gate over a job's title and description.
/// Not a ranking: a job either passes or it doesn't.
#[derive(Debug, Clone, Copy)]
pub struct KeywordGate {
    allow: &'static [&'static str],
    deny: &'static [&'static str],
}

impl KeywordGate {
    pub fn legal() -> Self {
        Self {
            allow: LEGAL_KEYWORDS,
            deny: BLACKLIST_KEYWORDS,
        }
    }

    pub fn passes(&self, job: &Job) -> bool {
        let text = format!("{} {}", job.job_title, job.description()).to_lowercase();

        if !self.allow.iter().any(|keyword| text.contains(keyword)) {
            return false;
        }
        !self.deny.iter().any(|keyword| text.contains(keyword))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job;

    #[test]
    fn test_requires_a_legal_keyword() {
        let gate = KeywordGate::legal();
        assert!(gate.passes(&job(1, "Corporate Attorney")));
        assert!(!gate.passes(&job(2, "Software Engineer")));
    }

    #[test]
    fn test_matches_description_too() {
        let gate = KeywordGate::legal();
        let mut j = job(1, "Associate");
        j.job_description_summary = Some("Supports the LITIGATION team".to_string());
        assert!(gate.passes(&j));
    }

    #[test]
    fn test_blacklist_wins() {
        let gate = KeywordGate::legal();
        assert!(!gate.passes(&job(1, "Legal Secretary")));
        assert!(!gate.passes(&job(2, "Legal Assistant")));
        // on both lists
        assert!(!gate.passes(&job(3, "Senior Paralegal")));
    }

    #[test]
    fn test_blacklisted_word_in_description() {
        let gate = KeywordGate::legal();
        let mut j = job(1, "Compliance Officer");
        j.job_description_summary = Some("Reports to the executive secretary".to_string());
        assert!(!gate.passes(&j));
    }

    #[test]
    fn test_multi_word_keywords() {
        let gate = KeywordGate::legal();
        assert!(gate.passes(&job(1, "Intellectual Property Specialist")));
        assert!(gate.passes(&job(2, "Law Firm Operations Manager")));
    }
}
