//! Worker context: runs decisions on a dedicated thread
//!
//! The caller talks to the worker only through messages. Requests are
//! handled in arrival order; sending a new `FIND_BEST_MOVE` (or `CANCEL`)
//! cancels whatever request is still pending or running. Each request
//! produces zero or more `PROGRESS_UPDATE` events followed by exactly one
//! `BEST_MOVE_FOUND`.

use std::sync::mpsc::{channel, Receiver, RecvError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use log::{debug, info, warn};

use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::error::EngineError;
use crate::protocol::{FindBestMove, Inbound, Outbound};
use crate::search::CancelToken;

enum Job {
    Decide(FindBestMove, CancelToken),
    NewGame,
}

/// Handle to a running worker thread.
pub struct Worker {
    jobs: Option<Sender<Job>>,
    events: Option<Receiver<Outbound>>,
    current: Arc<Mutex<CancelToken>>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Start a worker thread with its own engine. Events are read back
    /// through [`Worker::recv`].
    pub fn spawn(config: EngineConfig) -> Self {
        let (event_tx, event_rx) = channel();
        let mut worker = Self::with_events(config, event_tx);
        worker.events = Some(event_rx);
        worker
    }

    /// Start a worker thread that writes its events into `event_tx`.
    pub fn with_events(config: EngineConfig, event_tx: Sender<Outbound>) -> Self {
        let (job_tx, job_rx) = channel::<Job>();

        let handle = thread::spawn(move || {
            let mut engine = Engine::new(config);
            info!("worker started");
            for job in job_rx {
                match job {
                    Job::Decide(data, cancel) => decide(&engine, data, &cancel, &event_tx),
                    Job::NewGame => engine.new_game(),
                }
            }
            info!("worker stopped");
        });

        Self {
            jobs: Some(job_tx),
            events: None,
            current: Arc::new(Mutex::new(CancelToken::new())),
            handle: Some(handle),
        }
    }

    /// Deliver one inbound message.
    pub fn send(&self, message: Inbound) {
        let job = match message {
            Inbound::FindBestMove { data } => {
                let token = CancelToken::new();
                let previous = {
                    let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
                    std::mem::replace(&mut *current, token.clone())
                };
                if !previous.is_cancelled() {
                    debug!("cancelling the previous request");
                }
                previous.cancel();
                Job::Decide(data, token)
            }
            Inbound::Cancel => {
                self.cancel();
                return;
            }
            Inbound::NewGame => Job::NewGame,
        };

        if let Some(jobs) = &self.jobs {
            if jobs.send(job).is_err() {
                warn!("worker thread is gone, message dropped");
            }
        }
    }

    /// Parse and deliver one JSON message. A line that does not parse is
    /// returned as an error and gets no reply.
    pub fn send_json(&self, line: &str) -> Result<(), EngineError> {
        let message = Inbound::from_json(line)?;
        self.send(message);
        Ok(())
    }

    /// Cancel the pending or running request, if any.
    pub fn cancel(&self) {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel();
    }

    /// Block until the next event. Fails at once for a worker built with
    /// [`Worker::with_events`].
    pub fn recv(&self) -> Result<Outbound, RecvError> {
        match &self.events {
            Some(events) => events.recv(),
            None => Err(RecvError),
        }
    }

    /// Stop accepting work and wait for queued jobs to finish.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("worker thread panicked");
            }
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.cancel();
        self.stop();
    }
}

fn decide(engine: &Engine, data: FindBestMove, cancel: &CancelToken, events: &Sender<Outbound>) {
    let request = match data.into_request() {
        Ok(request) => request,
        Err(err) => {
            warn!("rejecting request: {err}");
            let _ = events.send(Outbound::BestMoveFound { best_move: None });
            return;
        }
    };

    let mut progress = |progress: u8| {
        let _ = events.send(Outbound::ProgressUpdate { progress });
    };
    let result = engine.decide(&request, &mut progress, cancel);
    let _ = events.send(Outbound::BestMoveFound {
        best_move: result.best_move,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Pos, Stone, CENTER};
    use crate::engine::Difficulty;

    /// Events up to and including the next `BEST_MOVE_FOUND`.
    fn collect(worker: &Worker) -> (Vec<u8>, Option<Pos>) {
        let mut progress = Vec::new();
        loop {
            match worker.recv().expect("worker alive") {
                Outbound::ProgressUpdate { progress: p } => progress.push(p),
                Outbound::BestMoveFound { best_move } => return (progress, best_move),
            }
        }
    }

    #[test]
    fn test_empty_board_request() {
        let worker = Worker::spawn(EngineConfig::default());
        let data = FindBestMove::from_board(&Board::new(), Stone::Black, Difficulty::Hard);
        worker.send(Inbound::FindBestMove { data });
        let (progress, best) = collect(&worker);
        assert_eq!(best, Some(CENTER));
        assert_eq!(progress, vec![100]);
    }

    #[test]
    fn test_missing_bitboards_answer_null() {
        let worker = Worker::spawn(EngineConfig::default());
        let data = FindBestMove {
            black_bitboard: Some(vec![0; 8]),
            computer_player: "black".into(),
            human_player: "white".into(),
            difficulty: "easy".into(),
            ..FindBestMove::default()
        };
        worker.send(Inbound::FindBestMove { data });
        let (progress, best) = collect(&worker);
        assert!(progress.is_empty());
        assert_eq!(best, None);
    }

    #[test]
    fn test_requests_answered_in_order() {
        let worker = Worker::spawn(EngineConfig::default());
        worker.send(Inbound::NewGame);

        let mut board = Board::new();
        for col in 3..7 {
            board.place_stone(Pos::new(7, col), Stone::Black);
        }
        let data = FindBestMove::from_board(&board, Stone::White, Difficulty::Easy);
        worker.send(Inbound::FindBestMove { data });
        let (progress, best) = collect(&worker);
        assert_eq!(best, Some(Pos::new(7, 2)));
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(progress.last(), Some(&100));

        let data = FindBestMove::from_board(&Board::new(), Stone::White, Difficulty::Easy);
        worker.send(Inbound::FindBestMove { data });
        assert_eq!(collect(&worker).1, Some(CENTER));
    }

    #[test]
    fn test_superseded_request_still_answers() {
        let worker = Worker::spawn(EngineConfig::default());
        let mut board = Board::new();
        board.place_stone(Pos::new(7, 7), Stone::Black);
        board.place_stone(Pos::new(7, 8), Stone::White);

        let slow = FindBestMove::from_board(&board, Stone::Black, Difficulty::Hard);
        worker.send(Inbound::FindBestMove { data: slow });
        let quick = FindBestMove::from_board(&Board::new(), Stone::Black, Difficulty::Easy);
        worker.send(Inbound::FindBestMove { data: quick });

        // The first request was cancelled but still ends with its own answer.
        let (first_progress, _) = collect(&worker);
        assert_eq!(first_progress.last(), Some(&100));
        assert_eq!(collect(&worker).1, Some(CENTER));
        worker.shutdown();
    }

    #[test]
    fn test_unparsed_lines_get_no_reply() {
        let (tx, rx) = channel();
        let worker = Worker::with_events(EngineConfig::default(), tx);

        let mut board = Board::new();
        for col in 3..7 {
            board.place_stone(Pos::new(7, col), Stone::Black);
        }
        let data = FindBestMove::from_board(&board, Stone::White, Difficulty::Medium);
        let request = serde_json::to_string(&Inbound::FindBestMove { data }).expect("serializable");

        assert!(worker.send_json(r#"{"type":"PING"}"#).is_err());
        worker.send_json(&request).expect("valid request");
        assert!(worker.send_json("not json").is_err());
        worker.shutdown();

        let events: Vec<Outbound> = rx.iter().collect();
        let answers: Vec<&Outbound> = events
            .iter()
            .filter(|e| matches!(e, Outbound::BestMoveFound { .. }))
            .collect();
        assert_eq!(
            answers,
            vec![&Outbound::BestMoveFound {
                best_move: Some(Pos::new(7, 2))
            }]
        );
        assert!(matches!(events.last(), Some(Outbound::BestMoveFound { .. })));
    }

    #[test]
    fn test_external_event_channel() {
        let (tx, rx) = channel();
        let worker = Worker::with_events(EngineConfig::default(), tx);
        let data = FindBestMove::from_board(&Board::new(), Stone::White, Difficulty::Medium);
        worker.send(Inbound::FindBestMove { data });
        worker.shutdown();

        let events: Vec<Outbound> = rx.iter().collect();
        assert_eq!(
            events.last(),
            Some(&Outbound::BestMoveFound {
                best_move: Some(CENTER)
            })
        );
    }
}
