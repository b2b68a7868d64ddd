use super::domain::{FieldType, Question, QuestionId, Section, SubQuestion};

const COMPANY_OVERVIEW: &str = "Company Overview";
const TECHNICAL_APPROACH: &str = "Technical Approach";
const PRICING: &str = "Pricing & Commercials";
const IMPLEMENTATION: &str = "Implementation & Support";

#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Default vendor response template used by the demo and the HTTP service.
    pub fn standard() -> Self {
        Self::new(standard_questions())
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| &question.id == id)
    }

    /// Unknown ids are treated as shareable.
    pub fn is_subject_specific(&self, id: &QuestionId) -> bool {
        self.question(id)
            .map(|question| question.subject_specific)
            .unwrap_or(false)
    }

    pub fn is_required(&self, id: &QuestionId) -> bool {
        self.question(id)
            .map(|question| question.required)
            .unwrap_or(false)
    }

    pub fn questions_for_section(&self, section: &str) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|question| question.section == section)
            .collect()
    }

    /// Sections in order of first appearance, each listing its questions in template order.
    pub fn sections(&self) -> Vec<Section> {
        group_sections(self.questions.iter())
    }

    /// Like [`QuestionCatalog::sections`] but restricted to weight-eligible questions.
    pub fn weighted_sections(&self) -> Vec<Section> {
        group_sections(self.questions.iter().filter(|question| question.weighted))
    }
}

fn group_sections<'a>(questions: impl Iterator<Item = &'a Question>) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    for question in questions {
        match sections
            .iter_mut()
            .find(|section| section.name == question.section)
        {
            Some(section) => section.question_ids.push(question.id.clone()),
            None => sections.push(Section {
                name: question.section.clone(),
                question_ids: vec![question.id.clone()],
            }),
        }
    }
    sections
}

fn sub_question(key: &str, prompt: &str) -> SubQuestion {
    SubQuestion {
        key: key.to_string(),
        prompt: prompt.to_string(),
    }
}

fn standard_questions() -> Vec<Question> {
    vec![
        Question::new(
            "company_description",
            COMPANY_OVERVIEW,
            "Describe your company, core offering, and the customers you serve.",
            FieldType::FreeText,
        )
        .required()
        .weighted(),
        Question::new(
            "years_in_business",
            COMPANY_OVERVIEW,
            "How long has your company been operating?",
            FieldType::Dropdown,
        )
        .required()
        .weighted()
        .with_options(["Less than 2 years", "2-5 years", "5-10 years", "10+ years"]),
        Question::new(
            "certifications",
            COMPANY_OVERVIEW,
            "Which certifications does your organization currently hold?",
            FieldType::MultiSelect,
        )
        .weighted()
        .with_options(["SOC 2 Type II", "ISO 27001", "HIPAA", "PCI DSS", "Other"]),
        Question::new(
            "client_references",
            COMPANY_OVERVIEW,
            "Provide a reference client for a comparable engagement.",
            FieldType::Composite {
                sub_questions: vec![
                    sub_question("client_name", "Client name"),
                    sub_question("contact_email", "Contact e-mail"),
                    sub_question("engagement_summary", "Engagement summary"),
                ],
            },
        )
        .weighted(),
        Question::new(
            "solution_overview",
            TECHNICAL_APPROACH,
            "Outline the solution you propose for this RFP's requirements.",
            FieldType::FreeText,
        )
        .required()
        .subject_specific()
        .weighted(),
        Question::new(
            "integration_support",
            TECHNICAL_APPROACH,
            "Which integration methods does your platform support?",
            FieldType::MultiSelect,
        )
        .weighted()
        .with_options(["REST API", "Webhooks", "SFTP", "SSO / SAML", "Other"]),
        Question::new(
            "hosting_model",
            TECHNICAL_APPROACH,
            "How is the solution hosted?",
            FieldType::SingleSelect,
        )
        .weighted()
        .with_options(["Multi-tenant SaaS", "Single-tenant SaaS", "On-premises", "Hybrid"]),
        Question::new(
            "security_documentation",
            TECHNICAL_APPROACH,
            "Upload your most recent security questionnaire or audit report.",
            FieldType::File,
        )
        .weighted(),
        Question::new(
            "pricing_model",
            PRICING,
            "Which pricing model applies to your proposal?",
            FieldType::SingleSelect,
        )
        .required()
        .weighted()
        .with_options(["Per seat", "Usage based", "Flat annual fee", "Fixed project fee"]),
        Question::new(
            "project_quote",
            PRICING,
            "Provide an itemized quote for the scope described in this RFP.",
            FieldType::FreeText,
        )
        .required()
        .subject_specific()
        .weighted(),
        Question::new(
            "payment_terms",
            PRICING,
            "What payment terms do you offer?",
            FieldType::Dropdown,
        )
        .weighted()
        .with_options(["Net 15", "Net 30", "Net 45", "Net 60"]),
        Question::new(
            "implementation_timeline",
            IMPLEMENTATION,
            "Estimate the implementation timeline for this engagement.",
            FieldType::FreeText,
        )
        .subject_specific()
        .weighted(),
        Question::new(
            "support_tiers",
            IMPLEMENTATION,
            "Which support tiers are included?",
            FieldType::MultiSelect,
        )
        .weighted()
        .with_options(["Business hours", "24/7", "Dedicated CSM", "Other"]),
        Question::new(
            "project_team",
            IMPLEMENTATION,
            "Who will lead delivery for this RFP?",
            FieldType::Composite {
                sub_questions: vec![
                    sub_question("lead_name", "Delivery lead"),
                    sub_question("lead_role", "Role"),
                ],
            },
        )
        .subject_specific(),
    ]
}
