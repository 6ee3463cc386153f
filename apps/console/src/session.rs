use std::io::Write;

use anyhow::Result;
use client_core::{ControllerState, InteractionController};
use shared::domain::Score;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::{input::OperatorCommand, presenter::ConsolePresenter};

/// Drives one session from operator input until quit, end of input, or
/// `rounds` judged decisions.
pub async fn run_session<W, R>(
    controller: &InteractionController,
    presenter: &ConsolePresenter<W>,
    input: R,
    rounds: Option<u32>,
) -> Result<Score>
where
    W: Write + Send,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    controller.start().await;

    loop {
        let state = controller.state().await;
        if let Some(limit) = rounds {
            if state == ControllerState::Resolved && controller.score().await.total >= limit {
                debug!(limit, "round limit reached");
                break;
            }
        }

        presenter.prompt(state);
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match OperatorCommand::parse(&line) {
            Some(OperatorCommand::Decide(action)) => controller.submit_decision(action).await,
            Some(OperatorCommand::Next) => controller.advance().await,
            // A fresh start from Ready would silently skip the guest on screen.
            Some(OperatorCommand::Retry)
                if matches!(state, ControllerState::Error | ControllerState::Idle) =>
            {
                controller.start().await
            }
            Some(OperatorCommand::Retry) => presenter.hint(),
            Some(OperatorCommand::Quit) => break,
            None => presenter.hint(),
        }
    }

    Ok(controller.score().await)
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
