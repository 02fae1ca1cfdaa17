//! Static field catalogue for the 37-criteria initiative dossier
//!
//! The catalogue is data, not logic: each criterion is a descriptor with a
//! typed `FieldKind` variant carrying that type's form configuration. The
//! engine only consults it for completeness checks and for listing.

use crate::criteria::CriteriaValues;
use serde::Serialize;
use serde_json::Value;
use FieldCategory::*;

pub const TEMPLATE_ID: &str = "template-petrolube-35-v14";
pub const TEMPLATE_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldCategory {
    Metadata,
    Strategic,
    Scoring,
    BusinessCase,
    Implementation,
    Dependencies,
    Raid,
    Metrics,
}

impl FieldCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldCategory::Metadata => "metadata",
            FieldCategory::Strategic => "strategic",
            FieldCategory::Scoring => "scoring",
            FieldCategory::BusinessCase => "business_case",
            FieldCategory::Implementation => "implementation",
            FieldCategory::Dependencies => "dependencies",
            FieldCategory::Raid => "raid",
            FieldCategory::Metrics => "metrics",
        }
    }
}

/// One selectable value of a dropdown, checklist or multiselect
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldOption {
    pub value: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

const fn opt(value: &'static str, label: &'static str) -> FieldOption {
    FieldOption {
        value,
        label,
        score: None,
    }
}

const fn scored(value: &'static str, label: &'static str, score: u32) -> FieldOption {
    FieldOption {
        value,
        label,
        score: Some(score),
    }
}

/// Field type with its type-specific configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text {
        max_length: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        pattern: Option<&'static str>,
    },
    Textarea {
        max_length: usize,
    },
    Dropdown {
        options: &'static [FieldOption],
    },
    Multiselect {
        options: &'static [FieldOption],
        gains: &'static [u32],
    },
    Checklist {
        options: &'static [FieldOption],
    },
    Number {
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<u32>,
        readonly: bool,
    },
    FinancialTable {
        years: &'static [u32],
        wacc: f64,
    },
    BenefitTable {
        max_categories: usize,
    },
    Timeline {
        fields: &'static [&'static str],
    },
    MiraConfig {
        layers: &'static [FieldOption],
        depth: &'static [&'static str],
    },
    DependencyList {
        fields: &'static [&'static str],
    },
    EnablerList {
        types: &'static [&'static str],
    },
    IntegrationList {
        systems: &'static [&'static str],
    },
    RiskMatrix {
        min_risks: usize,
        probability: &'static [&'static str],
        impact: &'static [&'static str],
    },
    AssumptionList {
        min_assumptions: usize,
        categories: &'static [&'static str],
    },
    IssueList {
        severity: &'static [&'static str],
    },
    CriteriaList {
        min_criteria: usize,
        fields: &'static [&'static str],
    },
    KpiList {
        min_kpis: usize,
        categories: &'static [&'static str],
        frequency: &'static [&'static str],
    },
    GovernanceConfig {
        sponsors: &'static [&'static str],
        reporting: &'static [&'static str],
        gates: &'static [&'static str],
    },
}

impl FieldKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text { .. } => "text",
            FieldKind::Textarea { .. } => "textarea",
            FieldKind::Dropdown { .. } => "dropdown",
            FieldKind::Multiselect { .. } => "multiselect",
            FieldKind::Checklist { .. } => "checklist",
            FieldKind::Number { .. } => "number",
            FieldKind::FinancialTable { .. } => "financial_table",
            FieldKind::BenefitTable { .. } => "benefit_table",
            FieldKind::Timeline { .. } => "timeline",
            FieldKind::MiraConfig { .. } => "mira_config",
            FieldKind::DependencyList { .. } => "dependency_list",
            FieldKind::EnablerList { .. } => "enabler_list",
            FieldKind::IntegrationList { .. } => "integration_list",
            FieldKind::RiskMatrix { .. } => "risk_matrix",
            FieldKind::AssumptionList { .. } => "assumption_list",
            FieldKind::IssueList { .. } => "issue_list",
            FieldKind::CriteriaList { .. } => "criteria_list",
            FieldKind::KpiList { .. } => "kpi_list",
            FieldKind::GovernanceConfig { .. } => "governance_config",
        }
    }
}

/// Descriptor of a single criterion
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub id: u32,
    pub key: &'static str,
    pub label: &'static str,
    pub category: FieldCategory,
    pub required: bool,
    /// Filled in by the engine rather than the author
    pub auto_calculated: bool,
    /// Suggested by the engine, confirmed by a reviewer
    pub ai_suggested: bool,
    /// Nominal weight (percent) for dimension-score fields, 0 otherwise
    pub weight: u32,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    const fn new(
        id: u32,
        key: &'static str,
        label: &'static str,
        category: FieldCategory,
        kind: FieldKind,
    ) -> Self {
        FieldDescriptor {
            id,
            key,
            label,
            category,
            required: true,
            auto_calculated: false,
            ai_suggested: false,
            weight: 0,
            kind,
        }
    }

    const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    const fn auto(mut self) -> Self {
        self.auto_calculated = true;
        self.required = false;
        self
    }

    const fn suggested(mut self, weight: u32) -> Self {
        self.ai_suggested = true;
        self.required = false;
        self.weight = weight;
        self
    }

    const fn dimension(self, weight: u32) -> Self {
        let mut field = self.auto();
        field.weight = weight;
        field
    }

    /// Whether the author must provide this criterion
    pub fn authored_and_required(&self) -> bool {
        self.required && !self.auto_calculated && !self.ai_suggested
    }
}

/// Versioned catalogue of criteria
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub version: &'static str,
    pub fields: &'static [FieldDescriptor],
}

impl Template {
    pub fn field(&self, key: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn by_category(
        &self,
        category: FieldCategory,
    ) -> impl Iterator<Item = &'static FieldDescriptor> {
        self.fields.iter().filter(move |f| f.category == category)
    }
}

pub fn template() -> &'static Template {
    &TEMPLATE
}

static TEMPLATE: Template = Template {
    id: TEMPLATE_ID,
    name: "Petrolube Initiative Dossier - 35 Criteria Framework V14",
    version: TEMPLATE_VERSION,
    fields: FIELDS,
};

const OWNERS: &[FieldOption] = &[
    opt("ceo", "CEO"),
    opt("cfo", "CFO"),
    opt("cito", "CITO"),
    opt("cmo", "Marketing Director"),
    opt("chro", "CHRO"),
    opt("pmo", "PMO Director"),
];

const DOMAINS: &[FieldOption] = &[
    opt("core_operations", "Core Operations"),
    opt("business_model", "Business Model Innovation"),
    opt("customer_experience", "Customer Experience"),
    opt("technology_data", "Technology & Data"),
    opt("ecosystem", "Ecosystem & Partnerships"),
    opt("organizational", "Organizational Transformation"),
];

const CATEGORIES: &[FieldOption] = &[
    opt("core_incremental", "Core Incremental (60%)"),
    opt("core_disruptive", "Core Disruptive (15%)"),
    opt("non_core_incremental", "Non-Core Incremental (15%)"),
    opt("non_core_disruptive", "Non-Core Disruptive (10%)"),
];

const QUADRANTS: &[FieldOption] = &[
    opt("quick_win", "Quick-Win (D1>=75, D2>=80)"),
    opt("push_harder", "Push-Harder (D1<75, D2>=80)"),
    opt("transformational", "Transformational (D1>=75, D2<80)"),
    opt("moonshot", "Moonshot (D1<75, D2<80)"),
];

const PRIORITIES: &[FieldOption] = &[
    opt("critical", "Critical (CEO mandate)"),
    opt("high", "High"),
    opt("medium", "Medium"),
    opt("low", "Low"),
];

const TIERS: &[FieldOption] = &[
    opt("1a", "Tier 1A: Catastrophic Dependency"),
    opt("1b", "Tier 1B: Quick-Win"),
    opt("1c", "Tier 1C: Foundation"),
    opt("1d", "Tier 1D: Strategic"),
    opt("2", "Tier 2: Positioning"),
    opt("contingent", "Contingent"),
];

const BCG_DIMENSIONS: &[FieldOption] = &[
    opt("d1", "Innovation Strategy"),
    opt("d2", "Organization & Decision Making"),
    opt("d3", "Governance & Metrics"),
    opt("d4", "Customer & Market Intelligence"),
    opt("d5", "Portfolio & Performance Mgmt"),
    opt("d6", "Talent & Culture"),
    opt("d7", "Analytics & Insights"),
    opt("d8", "Digital Technology"),
    opt("d9", "Ecosystems & Partnerships"),
    opt("d10", "Results Measurement"),
];

const TRL_LEVELS: &[FieldOption] = &[
    scored("9", "Proven in operational environment", 95),
    scored("8", "System complete and qualified", 90),
    scored("7", "System prototype in operation", 85),
    scored("6", "System model in relevant environment", 80),
    scored("5", "Component validation", 75),
    scored("4", "Component validation in lab", 65),
    scored("3", "Proof of concept", 60),
    scored("2", "Technology concept formulated", 55),
    scored("1", "Basic principles observed", 50),
];

const RESOURCES: &[FieldOption] = &[
    opt("team", "Team assigned"),
    opt("budget", "Budget confirmed"),
    opt("sponsor", "Executive sponsor identified"),
    opt("skills", "Required skills available"),
];

const MIRA_LAYERS: &[FieldOption] = &[
    scored("0", "No MiRA use", 0),
    scored("1", "Basic reporting", 30),
    scored("2", "Data lake/analytics", 50),
    scored("3", "ML/AI models", 70),
    scored("4", "API/ecosystem monetization", 90),
];

const DIMENSION_SCORE: FieldKind = FieldKind::Number {
    min: Some(0),
    max: Some(100),
    readonly: true,
};

const FIELDS: &[FieldDescriptor] = &[
    // metadata
    FieldDescriptor::new(
        1,
        "initiative_id",
        "Initiative ID",
        Metadata,
        FieldKind::Text {
            max_length: 10,
            pattern: Some("^[A-Z]{3}-[A-Z0-9]{1,6}$"),
        },
    ),
    FieldDescriptor::new(
        2,
        "initiative_name",
        "Initiative Name",
        Metadata,
        FieldKind::Text {
            max_length: 200,
            pattern: None,
        },
    ),
    FieldDescriptor::new(
        3,
        "owner_name",
        "Owner",
        Metadata,
        FieldKind::Dropdown { options: OWNERS },
    ),
    FieldDescriptor::new(
        4,
        "strategic_domain",
        "Strategic Domain",
        Metadata,
        FieldKind::Dropdown { options: DOMAINS },
    ),
    FieldDescriptor::new(
        5,
        "portfolio_category",
        "Portfolio Category",
        Metadata,
        FieldKind::Dropdown {
            options: CATEGORIES,
        },
    ),
    // strategic positioning
    FieldDescriptor::new(
        6,
        "quadrant",
        "Quadrant",
        Strategic,
        FieldKind::Dropdown { options: QUADRANTS },
    )
    .auto(),
    FieldDescriptor::new(
        7,
        "priority",
        "Priority",
        Strategic,
        FieldKind::Dropdown {
            options: PRIORITIES,
        },
    ),
    FieldDescriptor::new(
        8,
        "tier",
        "Year 1 Tier",
        Strategic,
        FieldKind::Dropdown { options: TIERS },
    )
    .auto(),
    FieldDescriptor::new(
        9,
        "aramco_response",
        "Aramco Competitive Response",
        Strategic,
        FieldKind::Textarea { max_length: 500 },
    ),
    FieldDescriptor::new(
        10,
        "bcg_i2i_dimensions",
        "BCG i2i Impact",
        Strategic,
        FieldKind::Multiselect {
            options: BCG_DIMENSIONS,
            gains: &[1, 2, 3, 4, 5, 6],
        },
    ),
    // dimension scores
    FieldDescriptor::new(
        11,
        "d1_score",
        "D1: Strategic Impact",
        Scoring,
        DIMENSION_SCORE,
    )
    .dimension(25),
    FieldDescriptor::new(
        12,
        "d2_score",
        "D2: Execution Feasibility",
        Scoring,
        DIMENSION_SCORE,
    )
    .dimension(25),
    FieldDescriptor::new(
        13,
        "d3_score",
        "D3: BCG i2i Advancement",
        Scoring,
        DIMENSION_SCORE,
    )
    .dimension(20),
    FieldDescriptor::new(
        14,
        "d4_score",
        "D4: Aramco Response",
        Scoring,
        FieldKind::Number {
            min: Some(0),
            max: Some(100),
            readonly: false,
        },
    )
    .suggested(15),
    FieldDescriptor::new(
        15,
        "d5_score",
        "D5: MiRA Integration",
        Scoring,
        DIMENSION_SCORE,
    )
    .dimension(10),
    FieldDescriptor::new(
        16,
        "d6_score",
        "D6: Three Engines Alignment",
        Scoring,
        DIMENSION_SCORE,
    )
    .dimension(10),
    // business case
    FieldDescriptor::new(
        17,
        "problem_statement",
        "Problem Statement",
        BusinessCase,
        FieldKind::Textarea { max_length: 1000 },
    ),
    FieldDescriptor::new(
        18,
        "solution_description",
        "Solution Description",
        BusinessCase,
        FieldKind::Textarea { max_length: 1500 },
    ),
    FieldDescriptor::new(
        19,
        "financial_projections",
        "Financial Projections",
        BusinessCase,
        FieldKind::FinancialTable {
            years: &[0, 1, 2, 3, 4, 5],
            wacc: crate::numeric::DEFAULT_WACC,
        },
    ),
    FieldDescriptor::new(
        20,
        "roi_analysis",
        "ROI Analysis",
        BusinessCase,
        FieldKind::BenefitTable { max_categories: 5 },
    ),
    FieldDescriptor::new(
        21,
        "stakeholder_impact",
        "Stakeholder Impact",
        BusinessCase,
        FieldKind::Text {
            max_length: 600,
            pattern: None,
        },
    ),
    FieldDescriptor::new(
        22,
        "competitive_analysis",
        "Competitive Analysis",
        BusinessCase,
        FieldKind::Textarea { max_length: 800 },
    ),
    FieldDescriptor::new(
        23,
        "strategic_rationale",
        "Strategic Rationale",
        BusinessCase,
        FieldKind::Textarea { max_length: 600 },
    ),
    // implementation
    FieldDescriptor::new(
        24,
        "trl_level",
        "Technology Readiness Level",
        Implementation,
        FieldKind::Dropdown {
            options: TRL_LEVELS,
        },
    ),
    FieldDescriptor::new(
        25,
        "resource_availability",
        "Resource Availability",
        Implementation,
        FieldKind::Checklist { options: RESOURCES },
    ),
    FieldDescriptor::new(
        26,
        "timeline",
        "Timeline",
        Implementation,
        FieldKind::Timeline {
            fields: &["start_date", "end_date", "confidence"],
        },
    ),
    FieldDescriptor::new(
        27,
        "mira_integration",
        "MiRA Integration",
        Implementation,
        FieldKind::MiraConfig {
            layers: MIRA_LAYERS,
            depth: &["low", "medium", "high"],
        },
    ),
    // dependencies
    FieldDescriptor::new(
        28,
        "prerequisites",
        "Prerequisites",
        Dependencies,
        FieldKind::DependencyList {
            fields: &["type", "name", "criticality", "due_date", "status"],
        },
    ),
    FieldDescriptor::new(
        29,
        "enablers",
        "Enablers",
        Dependencies,
        FieldKind::EnablerList {
            types: &["Technology", "Data", "Process", "Capability"],
        },
    ),
    FieldDescriptor::new(
        30,
        "integration_points",
        "Integration Points",
        Dependencies,
        FieldKind::IntegrationList {
            systems: &["Oracle", "MiRA", "SAP", "Custom"],
        },
    ),
    // raid
    FieldDescriptor::new(
        31,
        "risks",
        "Risks",
        Raid,
        FieldKind::RiskMatrix {
            min_risks: 3,
            probability: &["Very Low", "Low", "Medium", "High", "Very High"],
            impact: &["Negligible", "Low", "Medium", "High", "Catastrophic"],
        },
    ),
    FieldDescriptor::new(
        32,
        "assumptions",
        "Assumptions",
        Raid,
        FieldKind::AssumptionList {
            min_assumptions: 3,
            categories: &[
                "Market",
                "Technology",
                "Resource",
                "Financial",
                "Regulatory",
            ],
        },
    ),
    FieldDescriptor::new(
        33,
        "issues",
        "Issues",
        Raid,
        FieldKind::IssueList {
            severity: &["Critical", "High", "Medium", "Low"],
        },
    )
    .optional(),
    FieldDescriptor::new(
        34,
        "dependency_count",
        "Total Critical Dependencies",
        Raid,
        FieldKind::Number {
            min: None,
            max: None,
            readonly: true,
        },
    )
    .auto(),
    // metrics
    FieldDescriptor::new(
        35,
        "success_criteria",
        "Success Criteria",
        Metrics,
        FieldKind::CriteriaList {
            min_criteria: 3,
            fields: &["metric", "baseline", "target", "timeframe", "method"],
        },
    ),
    FieldDescriptor::new(
        36,
        "kpis",
        "KPIs",
        Metrics,
        FieldKind::KpiList {
            min_kpis: 3,
            categories: &[
                "Financial",
                "Operational",
                "Customer",
                "Employee",
                "Strategic",
            ],
            frequency: &["Daily", "Weekly", "Monthly", "Quarterly"],
        },
    ),
    FieldDescriptor::new(
        37,
        "governance",
        "Governance",
        Metrics,
        FieldKind::GovernanceConfig {
            sponsors: &["CEO", "CFO", "CITO", "Other"],
            reporting: &["Daily", "Weekly", "Bi-weekly", "Monthly", "Quarterly"],
            gates: &["Gate 0", "Gate 1", "Gate 2", "Gate 3", "Gate 4", "Gate 5"],
        },
    ),
];

fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Keys of required, author-provided criteria that are missing or empty
pub fn missing_required(criteria: &CriteriaValues) -> Vec<&'static str> {
    template()
        .fields
        .iter()
        .filter(|f| f.authored_and_required())
        .filter(|f| !criteria.get(f.key).map(is_filled).unwrap_or(false))
        .map(|f| f.key)
        .collect()
}

/// Render the catalogue as an aligned table
pub fn render_catalogue_text(template: &Template) -> String {
    let mut output = String::new();
    output.push_str(&format!("{} (v{})\n\n", template.name, template.version));
    output.push_str(&format!(
        "{:<4} {:<30} {:<16} {:<18} {}\n",
        "ID", "KEY", "CATEGORY", "TYPE", "FLAGS"
    ));
    for field in template.fields {
        let mut flags = Vec::new();
        if field.required {
            flags.push("required".to_string());
        }
        if field.auto_calculated {
            flags.push("auto".to_string());
        }
        if field.ai_suggested {
            flags.push("suggested".to_string());
        }
        if field.weight > 0 {
            flags.push(format!("weight={}%", field.weight));
        }
        output.push_str(&format!(
            "{:<4} {:<30} {:<16} {:<18} {}\n",
            field.id,
            field.key,
            field.category.as_str(),
            field.kind.type_name(),
            if flags.is_empty() { "-".to_string() } else { flags.join(", ") }
        ));
    }
    output
}
