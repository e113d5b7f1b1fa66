//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::domain::{Difficulty, GameState, LifelineUsage, Question, CHOICE_COUNT};

/// Intents the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    StartGame {
        #[serde(default)]
        categories: Vec<String>,
    },
    SelectChoice {
        index: usize,
    },
    LockIn,
    /// Sent by the presentation layer once the answer-reveal delay elapsed.
    NextQuestion,
    WalkAway,
    UseFiftyFifty,
    UseAudiencePoll,
    UseSwitchQuestion,
    Reset,
}

/// Notifications the server pushes back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    /// `state: null` means the pre-game screen (no game committed).
    StateChanged {
        state: Option<GameStateOut>,
    },
    TimerTick {
        remaining: u32,
        total: u32,
    },
    AnswerResolved {
        correct: bool,
        #[serde(rename = "lockedChoice")]
        locked_choice: usize,
        #[serde(rename = "correctIndex")]
        correct_index: usize,
    },
    GameEnded {
        title: String,
        winnings: u64,
    },
    PollResults {
        percentages: [u32; CHOICE_COUNT],
    },
    Error {
        message: String,
    },
}

/// Question DTO sent to clients. Deliberately omits `correct_index`: the
/// answer is only revealed through `AnswerResolved`.
#[derive(Debug, Serialize)]
pub struct QuestionOut {
    pub id: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub prompt: String,
    pub choices: [String; CHOICE_COUNT],
}

/// Read-only snapshot of game state for the presentation layer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateOut {
    pub level: u32,
    pub question: QuestionOut,
    pub eliminated_choices: Vec<usize>,
    pub provisional_choice: Option<usize>,
    pub locked_choice: Option<usize>,
    pub answered: bool,
    pub poll_results: Option<[u32; CHOICE_COUNT]>,
    pub used_lifelines: LifelineUsage,
    pub remaining_time: u32,
    pub last_safe_level: u32,
    pub winnings: u64,
    pub game_over: bool,
    pub info_message: Option<String>,
    pub selected_categories: Vec<String>,
}

fn question_to_out(q: &Question) -> QuestionOut {
    QuestionOut {
        id: q.id.clone(),
        category: q.category.clone(),
        difficulty: q.difficulty,
        prompt: q.prompt.clone(),
        choices: q.choices.clone(),
    }
}

/// Convert the engine's internal state to the public snapshot DTO.
pub fn to_out(g: &GameState, provisional_choice: Option<usize>) -> GameStateOut {
    GameStateOut {
        level: g.level,
        question: question_to_out(g.current_question()),
        eliminated_choices: g.eliminated_choices.clone(),
        provisional_choice,
        locked_choice: g.locked_choice,
        answered: g.answered,
        poll_results: g.poll_results,
        used_lifelines: g.used_lifelines,
        remaining_time: g.remaining_time,
        last_safe_level: g.last_safe_level,
        winnings: g.winnings,
        game_over: g.game_over,
        info_message: g.info_message.clone(),
        selected_categories: g.selected_categories.clone(),
    }
}

//
// HTTP request/response DTOs
//

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct CategoriesOut {
    pub categories: Vec<String>,
}

#[derive(Serialize)]
pub struct LadderRungOut {
    pub level: u32,
    pub amount: u64,
    pub checkpoint: bool,
}

#[derive(Serialize)]
pub struct LadderOut {
    pub ladder: Vec<LadderRungOut>,
    #[serde(rename = "maxLevel")]
    pub max_level: u32,
}

pub fn ladder_to_out(config: &GameConfig) -> LadderOut {
    LadderOut {
        ladder: config
            .ladder
            .iter()
            .map(|e| LadderRungOut {
                level: e.level,
                amount: e.amount,
                checkpoint: config.is_checkpoint(e.level),
            })
            .collect(),
        max_level: config.max_level,
    }
}
