//! Study participant models

use serde::{Deserialize, Serialize};

/// A participant as listed by `GET /participants`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: i64,
    pub name: String,
}
