//! Validation rules for task form input.
//!
//! Every rule is a pure function over the raw field text that returns
//! `Ok(())` or a human-readable rejection. Each `Field` owns an ordered rule
//! list and is valid only when all of its rules pass. `FormErrors` keeps the
//! currently active rejections per field for the form layer.

use crate::repository::{Task, TaskPriority, TaskStatus};
use crate::utils::date::parse_due_date;
use chrono::{Local, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

pub type RuleResult = Result<(), &'static str>;
pub type Rule = fn(&str) -> RuleResult;

pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 100;
pub const DESCRIPTION_MIN: usize = 10;
pub const DESCRIPTION_MAX: usize = 500;

fn title_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-zA-Z0-9\s\-_.,!?()]+$").expect("title pattern is valid"))
}

fn length(value: &str) -> usize {
    value.chars().count()
}

pub fn title_required(value: &str) -> RuleResult {
    if value.is_empty() {
        Err("Title is required")
    } else {
        Ok(())
    }
}

pub fn title_min_length(value: &str) -> RuleResult {
    if length(value) >= TITLE_MIN {
        Ok(())
    } else {
        Err("Title must be at least 3 characters")
    }
}

pub fn title_max_length(value: &str) -> RuleResult {
    if length(value) <= TITLE_MAX {
        Ok(())
    } else {
        Err("Title must be less than 100 characters")
    }
}

pub fn title_characters(value: &str) -> RuleResult {
    if title_pattern().is_match(value) {
        Ok(())
    } else {
        Err("Title contains invalid characters")
    }
}

pub fn description_required(value: &str) -> RuleResult {
    if value.is_empty() {
        Err("Description is required")
    } else {
        Ok(())
    }
}

pub fn description_min_length(value: &str) -> RuleResult {
    if length(value) >= DESCRIPTION_MIN {
        Ok(())
    } else {
        Err("Description must be at least 10 characters")
    }
}

pub fn description_max_length(value: &str) -> RuleResult {
    if length(value) <= DESCRIPTION_MAX {
        Ok(())
    } else {
        Err("Description must be less than 500 characters")
    }
}

pub fn status_required(value: &str) -> RuleResult {
    if value.is_empty() {
        Err("Status is required")
    } else {
        Ok(())
    }
}

pub fn status_known(value: &str) -> RuleResult {
    value
        .parse::<TaskStatus>()
        .map(|_| ())
        .map_err(|_| "Invalid status")
}

pub fn priority_required(value: &str) -> RuleResult {
    if value.is_empty() {
        Err("Priority is required")
    } else {
        Ok(())
    }
}

pub fn priority_known(value: &str) -> RuleResult {
    value
        .parse::<TaskPriority>()
        .map(|_| ())
        .map_err(|_| "Invalid priority")
}

pub fn due_date_required(value: &str) -> RuleResult {
    if value.is_empty() {
        Err("Due date is required")
    } else {
        Ok(())
    }
}

/// Reject dates before the current local day.
///
pub fn due_date_not_past(value: &str) -> RuleResult {
    due_date_not_before(value, Local::now().date_naive())
}

/// Reject dates before `today`; unparsable dates are rejected the same way.
///
pub fn due_date_not_before(value: &str, today: NaiveDate) -> RuleResult {
    match parse_due_date(value) {
        Some(due) if due.date() >= today => Ok(()),
        _ => Err("Due date cannot be in the past"),
    }
}

const TITLE_RULES: [Rule; 4] = [
    title_required,
    title_min_length,
    title_max_length,
    title_characters,
];
const DESCRIPTION_RULES: [Rule; 3] = [
    description_required,
    description_min_length,
    description_max_length,
];
const STATUS_RULES: [Rule; 2] = [status_required, status_known];
const PRIORITY_RULES: [Rule; 2] = [priority_required, priority_known];
const DUE_DATE_RULES: [Rule; 2] = [due_date_required, due_date_not_past];

/// Form fields carrying validation rules.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Description,
    Status,
    Priority,
    DueDate,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Title,
        Field::Description,
        Field::Status,
        Field::Priority,
        Field::DueDate,
    ];

    /// Ordered rules applied to this field.
    ///
    pub fn rules(self) -> &'static [Rule] {
        match self {
            Field::Title => &TITLE_RULES,
            Field::Description => &DESCRIPTION_RULES,
            Field::Status => &STATUS_RULES,
            Field::Priority => &PRIORITY_RULES,
            Field::DueDate => &DUE_DATE_RULES,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::Status => "status",
            Field::Priority => "priority",
            Field::DueDate => "dueDate",
        }
    }
}

/// Run every rule of `field` and collect the rejections in rule order.
///
pub fn check(field: Field, value: &str) -> Vec<String> {
    field
        .rules()
        .iter()
        .filter_map(|rule| rule(value).err())
        .map(str::to_string)
        .collect()
}

/// Active rejection messages per field.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub title: Vec<String>,
    pub description: Vec<String>,
    pub status: Vec<String>,
    pub priority: Vec<String>,
    pub due_date: Vec<String>,
}

impl FormErrors {
    /// Returns an instance with no messages for any field.
    ///
    pub fn create_empty() -> Self {
        FormErrors::default()
    }

    pub fn get(&self, field: Field) -> &[String] {
        match field {
            Field::Title => &self.title,
            Field::Description => &self.description,
            Field::Status => &self.status,
            Field::Priority => &self.priority,
            Field::DueDate => &self.due_date,
        }
    }

    fn get_mut(&mut self, field: Field) -> &mut Vec<String> {
        match field {
            Field::Title => &mut self.title,
            Field::Description => &mut self.description,
            Field::Status => &mut self.status,
            Field::Priority => &mut self.priority,
            Field::DueDate => &mut self.due_date,
        }
    }

    pub fn clear(&mut self, field: Field) {
        self.get_mut(field).clear();
    }

    pub fn clear_all(&mut self) {
        for field in Field::ALL {
            self.clear(field);
        }
    }

    /// Replace the messages of `field` with the rejections for `value` and
    /// return whether it passed.
    ///
    pub fn validate_field(&mut self, field: Field, value: &str) -> bool {
        let messages = check(field, value);
        let valid = messages.is_empty();
        *self.get_mut(field) = messages;
        valid
    }

    /// Validate every field of `task` and return whether all of them passed.
    ///
    pub fn validate_task(&mut self, task: &Task) -> bool {
        let values = [
            (Field::Title, task.title.as_str()),
            (Field::Description, task.description.as_str()),
            (Field::Status, task.status.as_str()),
            (Field::Priority, task.priority.as_str()),
            (Field::DueDate, task.due_date.as_str()),
        ];
        values
            .into_iter()
            .fold(true, |valid, (field, value)| self.validate_field(field, value) && valid)
    }

    pub fn is_valid(&self) -> bool {
        Field::ALL.into_iter().all(|field| self.get(field).is_empty())
    }

    /// Iterate over fields that currently have messages.
    ///
    pub fn failures(&self) -> impl Iterator<Item = (Field, &[String])> {
        Field::ALL
            .into_iter()
            .map(move |field| (field, self.get(field)))
            .filter(|(_, messages)| !messages.is_empty())
    }
}
