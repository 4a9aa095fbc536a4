//! Testing utilities for KPI desk workspace
//!
//! Shared fixtures (a populated data directory) and a scripted surface.

#![allow(missing_docs)]

use kpi_form::{Notice, NoticeLevel, Prompt, Surface};
use kpi_literal::LiteralMap;
use kpi_store::TableFiles;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const USERS: &str = "UserName|RoleID\n\
u1@gmail.com|1\n\
u2@gmail.com|2\n\
ghost@gmail.com|9\n";

pub const ROLES: &str = "RoleID|Role|KPIs\n\
1|Analyst|['K1']\n\
2|Manager|['K1', 'K2']\n";

pub const KPI_DATA: &str = "KPI_Id|KPI|KPI_Value_Date|KPI_Values\n\
K1|K1|2024-01-01|{'target':100}\n\
K2|Churn|2024-01-01|{'rate':0.5,'note':'baseline'}\n\
K1|K1|2024-02-01|{'target':120}\n";

pub const KPI_INFO: &str = "KPI_Name|Meta_Data\n\
K1|{'target':'int'}\n\
Churn|{'rate':{'type':'decimal','min':0,'max':1},'note':'str'}\n";

/// Write the four tables into `dir` with default file names
pub fn write_tables(dir: &Path) {
    write_tables_with(dir, USERS, ROLES, KPI_DATA, KPI_INFO);
}

pub fn write_tables_with(dir: &Path, users: &str, roles: &str, kpi_data: &str, kpi_info: &str) {
    let files = TableFiles::default();
    fs::write(dir.join(&files.users), users).unwrap();
    fs::write(dir.join(&files.roles), roles).unwrap();
    fs::write(dir.join(&files.kpi_data), kpi_data).unwrap();
    fs::write(dir.join(&files.kpi_info), kpi_info).unwrap();
}

/// Temporary data directory holding the default fixture tables
pub fn fixture_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_tables(dir.path());
    dir
}

pub fn read_kpi_data(dir: &Path) -> String {
    fs::read_to_string(dir.join(TableFiles::default().kpi_data)).unwrap()
}

/// Surface that replays canned answers and records everything shown
///
/// Choices are given by option text. An exhausted queue answers like a
/// closed terminal: `None` for choices and prompts, `false` for confirms.
#[derive(Debug, Default)]
pub struct ScriptedSurface {
    choices: VecDeque<String>,
    inputs: VecDeque<String>,
    confirms: VecDeque<bool>,
    pub notices: Vec<Notice>,
    pub prompts: Vec<Prompt>,
    pub menus: Vec<(String, Vec<String>)>,
    pub comparisons: Vec<(LiteralMap, LiteralMap)>,
}

impl ScriptedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_choose(mut self, option: &str) -> Self {
        self.choices.push_back(option.to_string());
        self
    }

    pub fn then_input(mut self, raw: &str) -> Self {
        self.inputs.push_back(raw.to_string());
        self
    }

    pub fn then_confirm(mut self, answer: bool) -> Self {
        self.confirms.push_back(answer);
        self
    }

    pub fn messages(&self, level: NoticeLevel) -> Vec<&str> {
        self.notices
            .iter()
            .filter(|n| n.level == level)
            .map(|n| n.message.as_str())
            .collect()
    }

    pub fn has_notice(&self, level: NoticeLevel, message: &str) -> bool {
        self.messages(level).contains(&message)
    }
}

impl Surface for ScriptedSurface {
    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    fn choose(&mut self, label: &str, options: &[String]) -> Option<usize> {
        self.menus.push((label.to_string(), options.to_vec()));
        let wanted = self.choices.pop_front()?;
        options.iter().position(|o| *o == wanted)
    }

    fn prompt(&mut self, prompt: &Prompt) -> Option<String> {
        self.prompts.push(prompt.clone());
        self.inputs.pop_front()
    }

    fn compare(&mut self, original: &LiteralMap, updated: &LiteralMap) {
        self.comparisons.push((original.clone(), updated.clone()));
    }

    fn confirm(&mut self, _label: &str) -> bool {
        self.confirms.pop_front().unwrap_or(false)
    }
}
