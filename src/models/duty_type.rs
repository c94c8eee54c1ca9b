use serde::{Deserialize, Serialize};

/// One row of the `duty_types` catalog table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DutyTypeDefinition {
    pub id: i64,
    pub name: String,             // ⇔ duty_types.name (canonical name)
    pub source_code: String,      // ⇔ duty_types.source_code (code written in the roster cell)
    pub position_qualifier: Option<String>, // ⇔ duty_types.position_qualifier
    pub active: bool,
}

impl DutyTypeDefinition {
    /// True when this definition may be assigned to a row with the given position code.
    /// Unqualified definitions match any position.
    pub fn accepts_position(&self, position: &str) -> bool {
        match &self.position_qualifier {
            Some(q) => q == position,
            None => true,
        }
    }

    pub fn qualifier_str(&self) -> &str {
        self.position_qualifier.as_deref().unwrap_or("")
    }
}

/// Seed record for the catalog, as read from a seed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDutyType {
    pub name: String,
    pub source_code: String,
    #[serde(default)]
    pub position_qualifier: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl NewDutyType {
    pub fn new(name: &str, source_code: &str, position_qualifier: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            source_code: source_code.to_string(),
            position_qualifier: position_qualifier.map(str::to_string),
            active: true,
        }
    }

    /// The standard duty types loaded at deployment.
    pub fn standard_set() -> Vec<Self> {
        vec![
            Self::new("Дежурный по роте", "Р", Some("ДЖ")),
            Self::new("Дневальный по роте", "Р", Some("ДН")),
            Self::new("Заступающий дежурный по роте", "ЗН Р", Some("ДЖ")),
            Self::new("Заступающий дневальный по роте", "ЗН Р", Some("ДН")),
            Self::new("Ответственный", "Ответственный", None),
            Self::new("Рабочая группа", "РГ", None),
            Self::new("Дежурный по технопарку", "ДТП", None),
            Self::new("Заступающий дежурный по технопарку", "ЗН ДТП", None),
        ]
    }
}
