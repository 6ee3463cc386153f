use shared::domain::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorCommand {
    Decide(Action),
    Next,
    Retry,
    Quit,
}

impl OperatorCommand {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "a" | "allow" => Some(Self::Decide(Action::Allow)),
            "d" | "deny" => Some(Self::Decide(Action::Deny)),
            "n" | "next" => Some(Self::Next),
            "r" | "retry" => Some(Self::Retry),
            "q" | "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}
