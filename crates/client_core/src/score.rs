use shared::domain::{Score, Verdict};

/// Session tally of judged decisions.
#[derive(Debug, Default)]
pub struct ScoreTracker {
    score: Score,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, verdict: &Verdict) {
        self.score.total += 1;
        if verdict.correct {
            self.score.correct += 1;
        }
    }

    pub fn snapshot(&self) -> Score {
        self.score
    }
}
