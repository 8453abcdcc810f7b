//! Browser state: the loaded records, the venue filter and the selection.

use burgerlog_core::{Record, RecordId};

/// Current view in the browser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Cards,
    Table,
}

impl Screen {
    pub const ALL: [Screen; 2] = [Screen::Cards, Screen::Table];

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Cards => "Kartlar",
            Screen::Table => "Tablo",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Screen::Cards => Screen::Table,
            Screen::Table => Screen::Cards,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Screen::Cards => 0,
            Screen::Table => 1,
        }
    }
}

/// Work the event loop has to carry out against the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Delete(RecordId),
    Reload,
}

#[derive(Debug)]
pub struct App {
    pub current_screen: Screen,
    pub running: bool,
    pub records: Vec<Record>,
    pub filter: String,
    /// Keystrokes go to the filter while set
    pub filtering: bool,
    /// Index into `visible()`
    pub selected: usize,
    pub pending_delete: Option<RecordId>,
    pub status: String,
    pub source: String,
}

impl App {
    pub fn new(records: Vec<Record>, source: impl Into<String>) -> Self {
        let mut app = Self {
            current_screen: Screen::Cards,
            running: true,
            records: Vec::new(),
            filter: String::new(),
            filtering: false,
            selected: 0,
            pending_delete: None,
            status: String::new(),
            source: source.into(),
        };
        app.set_records(records);
        app
    }

    pub fn set_records(&mut self, records: Vec<Record>) {
        self.status = format!("{} kayıt yüklendi", records.len());
        self.records = records;
        self.clamp_selection();
    }

    /// Records whose venue contains the filter, ignoring case.
    pub fn visible(&self) -> Vec<&Record> {
        let needle = self.filter.trim().to_lowercase();
        self.records
            .iter()
            .filter(|record| needle.is_empty() || record.venue().to_lowercase().contains(&needle))
            .collect()
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.visible().get(self.selected).copied()
    }

    pub fn select_next(&mut self) {
        let max = self.visible().len().saturating_sub(1);
        self.selected = (self.selected + 1).min(max);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.visible().len().saturating_sub(1);
    }

    pub fn next_screen(&mut self) {
        self.current_screen = self.current_screen.next();
    }

    pub fn push_filter(&mut self, c: char) {
        self.filter.push(c);
        self.selected = 0;
    }

    pub fn pop_filter(&mut self) {
        self.filter.pop();
        self.selected = 0;
    }

    pub fn clear_filter(&mut self) {
        self.filter.clear();
        self.filtering = false;
        self.selected = 0;
    }

    /// Marks the selected record; nothing is deleted until confirmed.
    pub fn request_delete(&mut self) {
        let target = self
            .selected_record()
            .map(|record| (record.id().clone(), record.venue().to_string()));
        if let Some((id, venue)) = target {
            self.status = format!("'{venue}' silinsin mi? (y/n)");
            self.pending_delete = Some(id);
        }
    }

    pub fn confirm_delete(&mut self) -> Option<Action> {
        self.pending_delete.take().map(Action::Delete)
    }

    pub fn cancel_delete(&mut self) {
        if self.pending_delete.take().is_some() {
            self.status = "Silme iptal edildi".to_string();
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}
