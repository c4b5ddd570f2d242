use super::hash::{COMPLETE_FIELDS, HashSpec, INITIALIZE8_FIELDS};

/// PxOrder operations supported by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Initialize8,
    Complete,
}

impl Operation {
    /// Remote operation name, as declared in the WSDL.
    pub fn name(self) -> &'static str {
        match self {
            Operation::Initialize8 => "Initialize8",
            Operation::Complete => "Complete",
        }
    }

    pub fn hash_fields(self) -> HashSpec {
        match self {
            Operation::Initialize8 => INITIALIZE8_FIELDS,
            Operation::Complete => COMPLETE_FIELDS,
        }
    }

    /// Response field carrying the XML payload.
    pub fn result_field(self) -> String {
        format!("{}Result", self.name())
    }
}
