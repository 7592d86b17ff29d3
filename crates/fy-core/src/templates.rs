//! Read-only starter content keyed by [`DiagramType`].

use serde::Serialize;

use crate::DiagramType;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Basic,
    Advanced,
    /// Renderer-safe flowchart stand-ins for diagram kinds that do not render
    /// everywhere (quadrant, requirement, sankey, git graph).
    Fallback,
}

impl TemplateCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Advanced => "advanced",
            Self::Fallback => "fallback",
        }
    }
}

/// Entry of the starter-template gallery.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DiagramTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: TemplateCategory,
    pub diagram_type: DiagramType,
    pub icon: &'static str,
    pub code: &'static str,
}

/// Full example document shown when a new diagram of `kind` is created.
#[must_use]
pub const fn default_content(kind: DiagramType) -> &'static str {
    match kind {
        DiagramType::Class => {
            "classDiagram
    class Animal {
        +String name
        +int age
        +isMammal()
    }
    class Dog {
        +String breed
        +bark()
    }
    Animal <|-- Dog"
        }
        DiagramType::Sequence => {
            "sequenceDiagram
    participant User
    participant System
    participant Database

    User->>System: Request data
    System->>Database: Query
    Database-->>System: Return results
    System-->>User: Display data"
        }
        DiagramType::Flowchart => {
            "flowchart TD
    A[Start] --> B{Is it working?}
    B -->|Yes| C[Great!]
    B -->|No| D[Debug]
    D --> B
    C --> E[End]"
        }
        DiagramType::State => {
            "stateDiagram-v2
    [*] --> Idle
    Idle --> Processing: Start
    Processing --> Success: Complete
    Processing --> Error: Fail
    Success --> [*]
    Error --> Idle: Retry"
        }
        DiagramType::Er => {
            "erDiagram
    CUSTOMER ||--o{ ORDER : places
    ORDER ||--|{ LINE_ITEM : contains
    PRODUCT ||--o{ LINE_ITEM : \"is in\"

    CUSTOMER {
        int id PK
        string name
        string email
    }
    ORDER {
        int id PK
        date created
        string status
    }
    PRODUCT {
        int id PK
        string name
        float price
    }"
        }
        DiagramType::Gantt => {
            "gantt
    title Project Schedule
    dateFormat YYYY-MM-DD
    section Planning
        Requirements    :a1, 2024-01-01, 7d
        Design          :a2, after a1, 5d
    section Development
        Implementation  :a3, after a2, 14d
        Testing         :a4, after a3, 7d
    section Deployment
        Release         :a5, after a4, 2d"
        }
        DiagramType::Pie => {
            "pie showData title Browser Market Share
    \"Chrome\": 65
    \"Safari\": 19
    \"Firefox\": 8
    \"Edge\": 5
    \"Other\": 3"
        }
        DiagramType::Mindmap => {
            "mindmap
    root((Project Planning))
        Goals
            Increase Revenue
            Improve UX
        Resources
            Team
                Developers
                Designers
            Budget
        Timeline
            Q1
            Q2"
        }
        DiagramType::Timeline => {
            "timeline
    title Product Roadmap
    section 2024
        Q1: Research & Planning
        Q2: MVP Development
        Q3: Beta Launch
        Q4: Public Release
    section 2025
        Q1: Feature Expansion"
        }
        DiagramType::GitGraph => {
            "gitGraph
    commit id: \"Initial\"
    branch develop
    commit id: \"Add feature\"
    commit id: \"Fix bug\"
    checkout main
    merge develop id: \"Release v1.0\"
    branch hotfix
    commit id: \"Critical fix\"
    checkout main
    merge hotfix id: \"v1.0.1\""
        }
        DiagramType::Journey => {
            "journey
    title User Checkout Flow
    section Browse
      View products: 5: User
      Add to cart: 4: User
    section Checkout
      Enter details: 3: User
      Make payment: 2: User
    section Complete
      Receive confirmation: 5: User"
        }
    }
}

/// Minimal skeleton for an empty document of `kind`.
#[must_use]
pub const fn blank_content(kind: DiagramType) -> &'static str {
    match kind {
        DiagramType::Class => "classDiagram\n    class MyClass\n",
        DiagramType::Sequence => "sequenceDiagram\n    participant A\n",
        DiagramType::Flowchart => "flowchart TD\n    A[Start]\n",
        DiagramType::State => "stateDiagram-v2\n    [*] --> State1\n",
        DiagramType::Er => "erDiagram\n    ENTITY\n",
        DiagramType::Gantt => {
            "gantt\n    title My Project\n    dateFormat YYYY-MM-DD\n    section Tasks\n        Task 1: 2024-01-01, 1d\n"
        }
        DiagramType::Pie => "pie title My Chart\n    \"Item 1\": 100\n",
        DiagramType::Mindmap => "mindmap\n    root((Main Topic))\n",
        DiagramType::Timeline => "timeline\n    title My Timeline\n    2024: Event 1\n",
        DiagramType::GitGraph => "gitGraph\n    commit\n",
        DiagramType::Journey => {
            "journey\n    title My Journey\n    section Start\n      Task 1: 5: Actor\n"
        }
    }
}

const CLASS_TEMPLATES: &[&str] = &["classDiagram
    class Animal {
        +String name
        +int age
        +isMammal()
    }
    class Dog {
        +String breed
        +bark()
    }
    Animal <|-- Dog"];

const SEQUENCE_TEMPLATES: &[&str] = &["sequenceDiagram
    participant User
    participant System
    participant Database

    User->>System: Request data
    System->>Database: Query
    Database-->>System: Return results
    System-->>User: Display data"];

const FLOWCHART_TEMPLATES: &[&str] = &["flowchart TD
    A[Start] --> B{Is it working?}
    B -->|Yes| C[Great!]
    B -->|No| D[Debug]
    D --> B
    C --> E[End]"];

const STATE_TEMPLATES: &[&str] = &["stateDiagram-v2
    [*] --> Idle
    Idle --> Processing: Start
    Processing --> Success: Complete
    Processing --> Error: Fail
    Success --> [*]
    Error --> Idle: Retry"];

const ER_TEMPLATES: &[&str] = &["erDiagram
    CUSTOMER ||--o{ ORDER : places
    ORDER ||--|{ LINE_ITEM : contains
    PRODUCT ||--o{ LINE_ITEM : \"is in\"

    CUSTOMER {
        int id PK
        string name
        string email
    }
    ORDER {
        int id PK
        date created
        string status
    }"];

const GANTT_TEMPLATES: &[&str] = &["gantt
    title Project Schedule
    dateFormat YYYY-MM-DD
    section Planning
        Requirements    :a1, 2024-01-01, 7d
        Design          :a2, after a1, 5d
    section Development
        Implementation  :a3, after a2, 14d
        Testing         :a4, after a3, 7d"];

const PIE_TEMPLATES: &[&str] = &["pie showData title Browser Market Share
    \"Chrome\": 65
    \"Safari\": 19
    \"Firefox\": 8
    \"Edge\": 5
    \"Other\": 3"];

const MINDMAP_TEMPLATES: &[&str] = &["mindmap
    root((Project Planning))
        Goals
            Increase Revenue
            Improve UX
        Resources
            Team
                Developers
                Designers
            Budget"];

const TIMELINE_TEMPLATES: &[&str] = &["timeline
    title Product Roadmap
    section 2024
        Q1: Research & Planning
        Q2: MVP Development
        Q3: Beta Launch
        Q4: Public Release"];

const GITGRAPH_TEMPLATES: &[&str] = &["gitGraph
    commit id: \"Initial\"
    branch develop
    commit id: \"Add feature\"
    commit id: \"Fix bug\"
    checkout main
    merge develop id: \"Release v1.0\""];

const JOURNEY_TEMPLATES: &[&str] = &["journey
    title User Checkout Flow
    section Browse
      View products: 5: User
      Add to cart: 4: User
    section Checkout
      Enter details: 3: User
      Make payment: 2: User
    section Complete
      Receive confirmation: 5: User"];

#[must_use]
pub const fn templates_for(kind: DiagramType) -> &'static [&'static str] {
    match kind {
        DiagramType::Class => CLASS_TEMPLATES,
        DiagramType::Sequence => SEQUENCE_TEMPLATES,
        DiagramType::Flowchart => FLOWCHART_TEMPLATES,
        DiagramType::State => STATE_TEMPLATES,
        DiagramType::Er => ER_TEMPLATES,
        DiagramType::Gantt => GANTT_TEMPLATES,
        DiagramType::Pie => PIE_TEMPLATES,
        DiagramType::Mindmap => MINDMAP_TEMPLATES,
        DiagramType::Timeline => TIMELINE_TEMPLATES,
        DiagramType::GitGraph => GITGRAPH_TEMPLATES,
        DiagramType::Journey => JOURNEY_TEMPLATES,
    }
}

/// Template `index` for `kind`, falling back to the first one when the index
/// is out of range.
#[must_use]
pub fn template(kind: DiagramType, index: usize) -> &'static str {
    let templates = templates_for(kind);
    templates
        .get(index)
        .or_else(|| templates.first())
        .copied()
        .unwrap_or_default()
}

pub static STARTER_TEMPLATES: &[DiagramTemplate] = &[
    DiagramTemplate {
        id: "flowchart-basic",
        name: "Flowchart with Decision",
        description: "Process flow with conditional branching",
        category: TemplateCategory::Basic,
        diagram_type: DiagramType::Flowchart,
        icon: "🔀",
        code: "flowchart LR
  A[Start] --> B{Auth?}
  B -->|Yes| C[Dashboard]
  B -->|No| D[Login]
  C --> E[Settings]",
    },
    DiagramTemplate {
        id: "sequence-basic",
        name: "Sequence Diagram",
        description: "Message flow between participants",
        category: TemplateCategory::Basic,
        diagram_type: DiagramType::Sequence,
        icon: "🔄",
        code: "sequenceDiagram
  autonumber
  participant U as User
  participant W as WebApp
  participant API
  U->>W: Open
  W->>API: GET /status
  API-->>W: 200
  W-->>U: OK",
    },
    DiagramTemplate {
        id: "class-basic",
        name: "Class Diagram",
        description: "Classes with methods and relationships",
        category: TemplateCategory::Basic,
        diagram_type: DiagramType::Class,
        icon: "📦",
        code: "classDiagram
  class User {
    +String id
    +String name
    +login(): bool
  }
  class Order {
    +String id
    +Decimal total
    +submit()
  }
  User \"1\" o-- \"*\" Order",
    },
    DiagramTemplate {
        id: "state-basic",
        name: "State Diagram",
        description: "State machine with nested states",
        category: TemplateCategory::Basic,
        diagram_type: DiagramType::State,
        icon: "🔲",
        code: "stateDiagram-v2
  [*] --> Idle
  Idle --> Loading : fetch
  Loading --> Ready : ok
  Loading --> Error : fail
  state Ready {
    [*] --> Viewing
    Viewing --> Editing : edit
    Editing --> Viewing : save
  }
  Error --> Idle : retry",
    },
    DiagramTemplate {
        id: "er-basic",
        name: "ER Diagram",
        description: "Entity relationships with attributes",
        category: TemplateCategory::Basic,
        diagram_type: DiagramType::Er,
        icon: "🗄️",
        code: "erDiagram
  USER ||--o{ ORDER : places
  ORDER ||--|{ ORDER_LINE : contains
  PRODUCT ||--o{ ORDER_LINE : referenced
  USER {
    string id
    string email
  }
  PRODUCT {
    string id
    string name
    float price
  }",
    },
    DiagramTemplate {
        id: "journey-advanced",
        name: "User Journey",
        description: "UX flow with satisfaction scores",
        category: TemplateCategory::Advanced,
        diagram_type: DiagramType::Journey,
        icon: "🚶",
        code: "journey
  title Checkout UX
  section Browse
    See product: 5: User
    Add to cart: 4: User
  section Payment
    Enter card: 2: User
    Confirm payment: 2: User
  section Result
    Success page: 5: User",
    },
    DiagramTemplate {
        id: "gantt-advanced",
        name: "Gantt Chart",
        description: "Project schedule with milestones",
        category: TemplateCategory::Advanced,
        diagram_type: DiagramType::Gantt,
        icon: "📅",
        code: "gantt
  title Release Plan
  dateFormat YYYY-MM-DD
  section Dev
    Spec :done, des1, 2025-10-01, 5d
    Impl :active, des2, after des1, 14d
    Tests :des3, after des2, 7d
  section Release
    Deploy :crit, des4, after des3, 1d",
    },
    DiagramTemplate {
        id: "pie-advanced",
        name: "Pie Chart",
        description: "Simple data distribution",
        category: TemplateCategory::Advanced,
        diagram_type: DiagramType::Pie,
        icon: "🥧",
        code: "pie
  title Traffic by Source
  \"Direct\"  : 35
  \"Organic\" : 45
  \"Ads\"     : 20",
    },
    DiagramTemplate {
        id: "quadrant-fallback",
        name: "Quadrant Chart",
        description: "Impact/Effort prioritization matrix",
        category: TemplateCategory::Fallback,
        diagram_type: DiagramType::Flowchart,
        icon: "📊",
        code: "flowchart TB
  Q1[Quick Wins - High Impact Low Effort]
  Q2[Major Projects - High Impact High Effort]
  Q3[Fill-ins - Low Impact Low Effort]
  Q4[Thankless - Low Impact High Effort]

  Q1 --> Q2
  Q1 --> Q3
  Q2 --> Q4
  Q3 --> Q4",
    },
    DiagramTemplate {
        id: "requirement-fallback",
        name: "Requirement Traceability",
        description: "Requirements, tests, and services",
        category: TemplateCategory::Fallback,
        diagram_type: DiagramType::Flowchart,
        icon: "✅",
        code: "flowchart LR
  R1[Requirement: PCI-DSS compliant]
  T1[Test: PCI checklist]
  SVC[Service]

  SVC -- satisfies --> R1
  T1 -- verifies --> R1",
    },
    DiagramTemplate {
        id: "sankey-fallback",
        name: "Sankey Flow",
        description: "Flow volumes with weights",
        category: TemplateCategory::Fallback,
        diagram_type: DiagramType::Flowchart,
        icon: "📈",
        code: "flowchart LR
  Checkout[Checkout] -->|100| PSP[PSP]
  PSP -->|60| Settled[Settled]
  PSP -->|40| Declined[Declined]",
    },
    DiagramTemplate {
        id: "gitgraph-fallback",
        name: "Git Graph",
        description: "Branch and merge DAG",
        category: TemplateCategory::Fallback,
        diagram_type: DiagramType::Flowchart,
        icon: "🌳",
        code: "flowchart LR
  A[init] --> B[feat-A]
  A --> C[fix-1]
  B --> D[merge]
  C --> D",
    },
];

#[must_use]
pub fn starter_template(id: &str) -> Option<&'static DiagramTemplate> {
    STARTER_TEMPLATES.iter().find(|entry| entry.id == id)
}

#[cfg(test)]
mod tests {
    use super::{
        STARTER_TEMPLATES, TemplateCategory, blank_content, default_content, starter_template,
        template, templates_for,
    };
    use crate::DiagramType;

    #[test]
    fn every_type_has_content() {
        for kind in DiagramType::ALL {
            assert!(!default_content(kind).trim().is_empty(), "{kind}");
            assert!(!blank_content(kind).trim().is_empty(), "{kind}");
            assert!(!templates_for(kind).is_empty(), "{kind}");
        }
    }

    #[test]
    fn out_of_range_index_falls_back_to_first_template() {
        let first = template(DiagramType::Pie, 0);
        assert!(first.starts_with("pie"));
        assert_eq!(template(DiagramType::Pie, 42), first);
    }

    #[test]
    fn starter_template_ids_are_unique() {
        let mut ids: Vec<&str> = STARTER_TEMPLATES.iter().map(|entry| entry.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), STARTER_TEMPLATES.len());
    }

    #[test]
    fn fallback_templates_are_flowcharts() {
        for entry in STARTER_TEMPLATES
            .iter()
            .filter(|entry| entry.category == TemplateCategory::Fallback)
        {
            assert_eq!(entry.diagram_type, DiagramType::Flowchart, "{}", entry.id);
            assert!(entry.code.starts_with("flowchart"), "{}", entry.id);
        }
    }

    #[test]
    fn looks_up_starter_template_by_id() {
        let entry = starter_template("sequence-basic").expect("known template");
        assert_eq!(entry.diagram_type, DiagramType::Sequence);
        assert!(starter_template("missing").is_none());
    }

    #[test]
    fn catalogue_serializes_with_camel_case_fields() {
        let value = serde_json::to_value(STARTER_TEMPLATES[0]).expect("serialize template");
        assert_eq!(value["diagramType"], "flowchart");
        assert_eq!(value["category"], "basic");
    }
}
