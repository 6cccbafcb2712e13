//! Merge-field placeholders written into the template
//!
//! Tokens follow the Carbone convention `{d.<field>}`: the document generator
//! downstream substitutes `d.<field>` from the data object it is given.

use std::fmt;

/// A merge field emitted by the cleaner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    /// Addressee of the memo
    ClientName,
    /// Matter the memo is about
    CaseTitle,
    /// Body of the basic-facts section
    BasicFacts,
    /// Body of the legal-analysis section
    LegalOpinion,
    /// Body of the follow-up recommendations section
    Recommendations,
    /// Issuing firm in the signature block
    LawFirm,
    /// Issuance date in the signature block
    Date,
    /// Dates mentioned in the narrative
    EventDate,
}

impl Placeholder {
    /// Every placeholder, in the order the run summary lists them
    pub const ALL: [Self; 8] = [
        Self::ClientName,
        Self::CaseTitle,
        Self::BasicFacts,
        Self::LegalOpinion,
        Self::Recommendations,
        Self::LawFirm,
        Self::Date,
        Self::EventDate,
    ];

    /// Field name inside the data object
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::ClientName => "client_name",
            Self::CaseTitle => "case_title",
            Self::BasicFacts => "basic_facts",
            Self::LegalOpinion => "legal_opinion",
            Self::Recommendations => "recommendations",
            Self::LawFirm => "law_firm",
            Self::Date => "date",
            Self::EventDate => "event_date",
        }
    }

    /// Label shown next to the token in the run summary
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ClientName => "客户名称",
            Self::CaseTitle => "案件标题",
            Self::BasicFacts => "基本事实",
            Self::LegalOpinion => "法律分析",
            Self::Recommendations => "后续建议",
            Self::LawFirm => "律所名称",
            Self::Date => "日期",
            Self::EventDate => "事件日期",
        }
    }

    /// Token as written into the document, e.g. `{d.client_name}`
    #[must_use]
    pub fn token(self) -> String {
        format!("{{d.{}}}", self.field_name())
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{d.{}}}", self.field_name())
    }
}
