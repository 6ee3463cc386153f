//! Terminal rendering of the screening session.

use std::{
    io::Write,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use client_core::{ControllerState, PresentationPort};
use shared::domain::{Guest, Score};

/// `correct/total`, followed by the accuracy once anything has been judged.
pub fn format_score(score: Score) -> String {
    match score.accuracy() {
        Some(accuracy) => format!(
            "{}/{} ({:.0}% accuracy)",
            score.correct,
            score.total,
            accuracy * 100.0
        ),
        None => format!("{}/{}", score.correct, score.total),
    }
}

pub struct ConsolePresenter<W: Write + Send> {
    out: Mutex<W>,
    decision_enabled: AtomicBool,
    next_available: AtomicBool,
}

impl<W: Write + Send> ConsolePresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            decision_enabled: AtomicBool::new(false),
            next_available: AtomicBool::new(false),
        }
    }

    pub fn decision_enabled(&self) -> bool {
        self.decision_enabled.load(Ordering::SeqCst)
    }

    pub fn next_available(&self) -> bool {
        self.next_available.load(Ordering::SeqCst)
    }

    /// Lists the commands that make sense right now.
    pub fn prompt(&self, state: ControllerState) {
        let mut options = Vec::new();
        if self.decision_enabled() {
            options.push("[a]llow");
            options.push("[d]eny");
        }
        if self.next_available() {
            options.push("[n]ext");
        }
        if matches!(state, ControllerState::Error | ControllerState::Idle) {
            options.push("[r]etry");
        }
        options.push("[q]uit");
        self.write_line(&format!("> {}", options.join("  ")));
    }

    pub fn hint(&self) {
        self.write_line("Unrecognised command. Type a, d, n, r or q.");
    }

    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_line(&self, line: &str) {
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let _ = writeln!(out, "{line}");
        let _ = out.flush();
    }
}

impl<W: Write + Send> PresentationPort for ConsolePresenter<W> {
    fn show_loading(&self) {
        self.write_line("");
        self.write_line("Loading guest...");
    }

    fn show_guest(&self, guest: &Guest) {
        self.write_line(&format!("Guest: {}", guest.name));
        if !guest.introduction.is_empty() {
            self.write_line(&format!("  \"{}\"", guest.introduction));
        }
        for fact in &guest.facts {
            self.write_line(&format!("  - {fact}"));
        }
    }

    fn show_feedback(&self, message: &str) {
        self.write_line(message);
    }

    fn show_score(&self, correct: u32, total: u32) {
        self.write_line(&format!("Score: {}", format_score(Score { correct, total })));
    }

    fn set_decision_enabled(&self, enabled: bool) {
        self.decision_enabled.store(enabled, Ordering::SeqCst);
    }

    fn show_next_available(&self, available: bool) {
        self.next_available.store(available, Ordering::SeqCst);
    }
}
