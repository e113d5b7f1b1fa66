//! WebSocket session: one game engine per connection.
//!
//! This is the composition root on the server side of the presentation
//! boundary. The loop multiplexes client intents with internal session
//! events (timer ticks tagged with the engine's epoch, deferred info-notice
//! expiry), so no two engine mutations ever run concurrently. Effects
//! returned by the engine are interpreted here: notifications go out on the
//! socket, timer tasks get (re)spawned or aborted, and the switch-question
//! fetch runs inline with its result fed back through `apply_switch`.

use std::{collections::VecDeque, sync::Arc, time::Duration};

use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, error, info, instrument};

use crate::engine::{Effect, GameEngine};
use crate::protocol::{to_out, ClientWsMessage, ServerWsMessage};
use crate::state::AppState;

/// Events generated by the session's own background tasks.
enum SessionEvent {
  Tick { epoch: u64 },
  InfoExpired,
}

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "quizladder", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "quizladder", "WebSocket connected");
  let mut engine = GameEngine::new(state.config.clone());
  let (events_tx, mut events_rx) = mpsc::unbounded_channel::<SessionEvent>();
  let mut timer: Option<JoinHandle<()>> = None;

  loop {
    tokio::select! {
      incoming = socket.recv() => {
        let Some(Ok(msg)) = incoming else { break };
        match msg {
          Message::Text(txt) => {
            match serde_json::from_str::<ClientWsMessage>(&txt) {
              Ok(intent) => {
                debug!(target: "quizladder", "WS received: {:?}", &intent);
                if !process_intent(intent, &state, &mut engine, &mut socket, &events_tx, &mut timer).await {
                  break;
                }
              }
              Err(e) => {
                let err = ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) };
                if send(&mut socket, &err).await.is_err() {
                  break;
                }
              }
            }
          }
          Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
          Message::Close(_) => break,
          _ => {}
        }
      }
      Some(ev) = events_rx.recv() => {
        let effects = match ev {
          SessionEvent::Tick { epoch } => engine.tick(epoch),
          SessionEvent::InfoExpired => engine.clear_info(),
        };
        if apply_effects(effects, &state, &mut engine, &mut socket, &events_tx, &mut timer).await.is_err() {
          break;
        }
      }
    }
  }

  if let Some(h) = timer.take() {
    h.abort();
  }
  info!(target: "quizladder", "WebSocket disconnected");
}

/// Map one client intent to engine calls and carry out the effects.
/// Returns false when the socket is gone.
async fn process_intent(
  intent: ClientWsMessage,
  state: &Arc<AppState>,
  engine: &mut GameEngine,
  socket: &mut WebSocket,
  events_tx: &mpsc::UnboundedSender<SessionEvent>,
  timer: &mut Option<JoinHandle<()>>,
) -> bool {
  let effects = match intent {
    ClientWsMessage::Ping => {
      return send(socket, &ServerWsMessage::Pong).await.is_ok();
    }
    ClientWsMessage::StartGame { categories } => {
      let categories = if categories.is_empty() { state.categories() } else { categories };
      let count = state.config.max_level as usize;
      match state.generate_questions(&categories, count).await {
        Ok(questions) => engine.start(questions, categories),
        Err(e) => {
          // The only user-visible failure: nothing was committed, the
          // client stays on the pre-game screen.
          error!(target: "game", error = %e, "Unable to start a game");
          let msg = ServerWsMessage::Error { message: format!("Could not start the game: {}", e) };
          return send(socket, &msg).await.is_ok();
        }
      }
    }
    ClientWsMessage::SelectChoice { index } => engine.select_choice(index),
    ClientWsMessage::LockIn => engine.lock_in(),
    ClientWsMessage::NextQuestion => engine.next_question(),
    ClientWsMessage::WalkAway => engine.walk_away(),
    ClientWsMessage::UseFiftyFifty => engine.use_fifty_fifty(),
    ClientWsMessage::UseAudiencePoll => engine.use_audience_poll(),
    ClientWsMessage::UseSwitchQuestion => engine.use_switch_question(),
    ClientWsMessage::Reset => engine.reset(),
  };
  apply_effects(effects, state, engine, socket, events_tx, timer).await.is_ok()
}

/// Interpret engine effects in order. `FetchReplacement` is the one effect
/// that feeds further effects back into the queue.
async fn apply_effects(
  effects: Vec<Effect>,
  state: &Arc<AppState>,
  engine: &mut GameEngine,
  socket: &mut WebSocket,
  events_tx: &mpsc::UnboundedSender<SessionEvent>,
  timer: &mut Option<JoinHandle<()>>,
) -> Result<(), axum::Error> {
  let mut agenda: VecDeque<Effect> = effects.into();
  while let Some(effect) = agenda.pop_front() {
    match effect {
      Effect::State => {
        let snapshot = engine.game().map(|g| to_out(g, engine.provisional()));
        send(socket, &ServerWsMessage::StateChanged { state: snapshot }).await?;
      }
      Effect::TimerTick { remaining, total } => {
        send(socket, &ServerWsMessage::TimerTick { remaining, total }).await?;
      }
      Effect::AnswerResolved { correct, locked_choice, correct_index } => {
        send(socket, &ServerWsMessage::AnswerResolved { correct, locked_choice, correct_index }).await?;
      }
      Effect::GameEnded { title, winnings } => {
        send(socket, &ServerWsMessage::GameEnded { title, winnings }).await?;
      }
      Effect::PollResults { percentages } => {
        send(socket, &ServerWsMessage::PollResults { percentages }).await?;
      }
      Effect::StartTimer { epoch } => {
        if let Some(h) = timer.take() {
          h.abort();
        }
        *timer = Some(spawn_timer(epoch, events_tx.clone()));
      }
      Effect::StopTimer => {
        // Stale ticks already queued are dropped by the epoch check.
        if let Some(h) = timer.take() {
          h.abort();
        }
      }
      Effect::FetchReplacement { categories } => {
        let replacement = match state.generate_questions(&categories, 1).await {
          Ok(mut qs) => qs.pop(),
          Err(e) => {
            error!(target: "game", error = %e, "Replacement fetch failed");
            None
          }
        };
        for fx in engine.apply_switch(replacement) {
          agenda.push_back(fx);
        }
      }
      Effect::ClearInfoAfter { seconds } => {
        let tx = events_tx.clone();
        tokio::spawn(async move {
          tokio::time::sleep(Duration::from_secs(seconds)).await;
          let _ = tx.send(SessionEvent::InfoExpired);
        });
      }
    }
  }
  Ok(())
}

/// 1 s tick task. Ticks carry the epoch they were started under; the engine
/// drops any tick whose epoch is no longer current.
fn spawn_timer(epoch: u64, tx: mpsc::UnboundedSender<SessionEvent>) -> JoinHandle<()> {
  tokio::spawn(async move {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick completes immediately; skip it.
    interval.tick().await;
    loop {
      interval.tick().await;
      if tx.send(SessionEvent::Tick { epoch }).is_err() {
        break;
      }
    }
  })
}

async fn send(socket: &mut WebSocket, msg: &ServerWsMessage) -> Result<(), axum::Error> {
  let out = serde_json::to_string(msg).unwrap_or_else(|e| {
    serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
  });
  socket.send(Message::Text(out)).await
}
