use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    #[default]
    Student,
    Professor,
    #[serde(rename = "Class Representative")]
    ClassRepresentative,
}

impl Role {
    /// Professors and class representatives may post and remove content.
    pub fn can_edit(&self) -> bool {
        matches!(self, Role::Professor | Role::ClassRepresentative)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Professor => "Professor",
            Role::ClassRepresentative => "Class Representative",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "student" => Some(Role::Student),
            "professor" => Some(Role::Professor),
            "class representative" | "class-representative" | "class_rep" | "cr" => {
                Some(Role::ClassRepresentative)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_edit() {
        assert!(!Role::Student.can_edit());
        assert!(Role::Professor.can_edit());
        assert!(Role::ClassRepresentative.can_edit());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!(Role::from_str("Class Representative"), Some(Role::ClassRepresentative));
        assert_eq!(Role::from_str("class-representative"), Some(Role::ClassRepresentative));
        assert_eq!(Role::from_str("PROFESSOR"), Some(Role::Professor));
        assert_eq!(Role::from_str("dean"), None);
    }

    #[test]
    fn test_role_wire_spelling() {
        let json = serde_json::to_string(&Role::ClassRepresentative).unwrap();
        assert_eq!(json, "\"Class Representative\"");
    }
}
