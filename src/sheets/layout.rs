use serde_json::Value;

const CONTACT_HEADERS: [&str; 7] = [
    "Timestamp", "Name", "Email", "Subject", "Message", "Source", "Status",
];

const APPLICATION_HEADERS: [&str; 9] = [
    "Timestamp", "Type", "Name", "Email", "Experience", "Skills", "Motivation", "GitHub", "Status",
];

const NEW_STATUS: &str = "New";

/// Column layout of a sheet, picked by sheet name when the sheet is created.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetLayout {
    Contacts,
    Applications,
    /// Any other sheet: `Timestamp` followed by the record keys seen at creation.
    Generic(Vec<String>),
}

impl SheetLayout {
    pub fn for_sheet(name: &str, first_record: &Value) -> Self {
        match name {
            "contacts" => SheetLayout::Contacts,
            "applications" => SheetLayout::Applications,
            _ => {
                let keys = first_record
                    .as_object()
                    .map(|obj| {
                        let mut keys: Vec<String> = obj
                            .keys()
                            .filter(|k| k.as_str() != "timestamp")
                            .cloned()
                            .collect();
                        keys.sort();
                        keys
                    })
                    .unwrap_or_default();
                SheetLayout::Generic(keys)
            }
        }
    }

    pub fn headers(&self) -> Vec<String> {
        match self {
            SheetLayout::Contacts => CONTACT_HEADERS.iter().map(|h| h.to_string()).collect(),
            SheetLayout::Applications => {
                APPLICATION_HEADERS.iter().map(|h| h.to_string()).collect()
            }
            SheetLayout::Generic(keys) => std::iter::once("Timestamp".to_string())
                .chain(keys.iter().cloned())
                .collect(),
        }
    }

    pub fn row(&self, record: &Value) -> Vec<String> {
        let field = |name: &str| field_string(record, name).unwrap_or_default();

        match self {
            SheetLayout::Contacts => vec![
                field("timestamp"),
                field("name"),
                field("email"),
                field("subject"),
                field("message"),
                field_string(record, "source").unwrap_or_else(|| "website".to_string()),
                NEW_STATUS.to_string(),
            ],
            SheetLayout::Applications => vec![
                field("timestamp"),
                field("type"),
                field("name"),
                field("email"),
                field("experience"),
                field("skills"),
                field("motivation"),
                field("github"),
                NEW_STATUS.to_string(),
            ],
            SheetLayout::Generic(keys) => std::iter::once(field("timestamp"))
                .chain(keys.iter().map(|k| field(k.as_str())))
                .collect(),
        }
    }
}

fn field_string(value: &Value, field: &str) -> Option<String> {
    match value.get(field)? {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
