//! Typed roster entities shown by the admin console.
//!
//! Both structs deserialize from the camelCase JSON the console uses and
//! expose their fields to the pipeline under those same names.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::record::{RecordId, TableRecord};
use crate::value::Value;

/// An HR manager working for one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HrManager {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub company: String,
    pub department: String,
    pub status: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub employees_managed: u32,
    #[serde(default)]
    pub experience: u32,
    /// ISO date the manager joined.
    pub join_date: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub specializations: Vec<String>,
}

impl TableRecord for HrManager {
    fn id(&self) -> RecordId {
        RecordId::Int(self.id)
    }

    fn field(&self, name: &str) -> Option<Cow<'_, Value>> {
        let value = match name {
            "id" => Value::from(self.id),
            "name" => Value::from(self.name.as_str()),
            "email" => Value::from(self.email.as_str()),
            "phone" => Value::from(self.phone.as_str()),
            "company" => Value::from(self.company.as_str()),
            "department" => Value::from(self.department.as_str()),
            "status" => Value::from(self.status.as_str()),
            "rating" => Value::from(self.rating),
            "employeesManaged" => Value::from(self.employees_managed),
            "experience" => Value::from(self.experience),
            "joinDate" => Value::from(self.join_date.as_str()),
            "location" => Value::from(self.location.as_str()),
            "specializations" => Value::from(self.specializations.clone()),
            _ => return None,
        };
        Some(Cow::Owned(value))
    }
}

/// A staff member, optionally reporting to a named manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub position: String,
    pub department: String,
    pub company: String,
    #[serde(default)]
    pub manager: Option<String>,
    pub status: String,
    #[serde(default)]
    pub salary: f64,
    #[serde(default)]
    pub experience: u32,
    #[serde(default)]
    pub rating: Option<f64>,
    /// ISO date of hire.
    pub hire_date: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl TableRecord for StaffMember {
    fn id(&self) -> RecordId {
        RecordId::Int(self.id)
    }

    fn field(&self, name: &str) -> Option<Cow<'_, Value>> {
        let value = match name {
            "id" => Value::from(self.id),
            "name" => Value::from(self.name.as_str()),
            "email" => Value::from(self.email.as_str()),
            "phone" => Value::from(self.phone.as_str()),
            "position" => Value::from(self.position.as_str()),
            "department" => Value::from(self.department.as_str()),
            "company" => Value::from(self.company.as_str()),
            "manager" => Value::from(self.manager.clone()?),
            "status" => Value::from(self.status.as_str()),
            "salary" => Value::from(self.salary),
            "experience" => Value::from(self.experience),
            "rating" => Value::from(self.rating?),
            "hireDate" => Value::from(self.hire_date.as_str()),
            "skills" => Value::from(self.skills.clone()),
            _ => return None,
        };
        Some(Cow::Owned(value))
    }
}
