use super::DeviceSession;
use crate::error::{Error, Result};
use crate::prompt::{confirm_commit, Prompter};
use crate::render::RenderedConfig;

/// Where a configuration transaction currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Connected,
    ConfigMode,
    Submitted,
    Committed,
    Discarded,
    /// Config mode left without a candidate to commit (immediate-apply devices)
    Finished,
}

/// How a peering push ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Committed,
    Discarded,
}

/// Configuration change on one device, from entering config mode to commit
/// or discard. Owns the session and closes it when dropped, on every path.
pub struct ConfigTransaction<S: DeviceSession> {
    session: S,
    state: TransactionState,
}

impl<S: DeviceSession> ConfigTransaction<S> {
    /// Take ownership of a connected session and enter configuration mode
    pub fn begin(session: S) -> Result<Self> {
        let mut txn = Self {
            session,
            state: TransactionState::Connected,
        };
        txn.session.enter_config_mode()?;
        txn.state = TransactionState::ConfigMode;
        Ok(txn)
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Submit the whole batch in one go, returning the device echo
    pub fn submit(&mut self, config: &RenderedConfig) -> Result<String> {
        self.expect(TransactionState::ConfigMode, "submit")?;
        let commands = config.commands();
        tracing::info!("Submitting {} configuration lines", commands.len());
        let output = self.session.send_config_set(&commands)?;
        self.state = TransactionState::Submitted;
        Ok(output)
    }

    pub fn pending_diff(&mut self) -> Result<String> {
        self.expect(TransactionState::Submitted, "show pending changes")?;
        self.session.pending_diff()
    }

    pub fn commit(mut self) -> Result<String> {
        self.expect(TransactionState::Submitted, "commit")?;
        let output = self.session.commit()?;
        self.state = TransactionState::Committed;
        tracing::info!("Configuration committed");
        Ok(output)
    }

    pub fn discard(mut self) -> Result<String> {
        self.expect(TransactionState::Submitted, "discard")?;
        let output = self.session.discard()?;
        self.state = TransactionState::Discarded;
        tracing::info!("Candidate configuration discarded");
        Ok(output)
    }

    /// Leave config mode without commit gating
    pub fn finish(mut self) -> Result<String> {
        self.expect(TransactionState::Submitted, "finish")?;
        let output = self.session.exit_config_mode()?;
        self.state = TransactionState::Finished;
        Ok(output)
    }

    fn expect(&self, state: TransactionState, action: &str) -> Result<()> {
        if self.state == state {
            Ok(())
        } else {
            Err(Error::DeviceState(format!("cannot {} while {:?}", action, self.state)))
        }
    }
}

impl<S: DeviceSession> Drop for ConfigTransaction<S> {
    fn drop(&mut self) {
        if matches!(self.state, TransactionState::ConfigMode | TransactionState::Submitted) {
            tracing::warn!(
                "Closing session in {:?} state; uncommitted changes are left to the device",
                self.state
            );
        }
        self.session.close();
    }
}

/// Submit a peering change, show the diff and commit only on an explicit "yes"
pub fn push_peering<S: DeviceSession>(
    session: S,
    config: &RenderedConfig,
    prompter: &mut dyn Prompter,
) -> Result<Outcome> {
    let mut txn = ConfigTransaction::begin(session)?;
    let output = txn.submit(config)?;
    let compare = txn.pending_diff()?;
    prompter.say(&format!("{}\n{}", output, compare));

    if confirm_commit(prompter)? {
        let commit_output = txn.commit()?;
        prompter.say(&commit_output);
        Ok(Outcome::Committed)
    } else {
        prompter.say("Changes not confirmed. Exiting without committing.");
        txn.discard()?;
        Ok(Outcome::Discarded)
    }
}

/// Submit switch port configuration and print the device output
pub fn push_ports<S: DeviceSession>(
    session: S,
    config: &RenderedConfig,
    prompter: &mut dyn Prompter,
) -> Result<()> {
    let mut txn = ConfigTransaction::begin(session)?;
    let output = txn.submit(config)?;
    prompter.say(&output);
    txn.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompter;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every call; optionally fails one of them
    #[derive(Clone, Default)]
    struct RecordingSession {
        calls: Rc<RefCell<Vec<String>>>,
        fail_on: Option<&'static str>,
    }

    impl RecordingSession {
        fn failing(call: &'static str) -> Self {
            Self {
                fail_on: Some(call),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        fn record(&mut self, call: &'static str, output: &str) -> Result<String> {
            self.calls.borrow_mut().push(call.to_string());
            if self.fail_on == Some(call) {
                return Err(Error::DeviceState(format!("{} refused", call)));
            }
            Ok(output.to_string())
        }
    }

    impl DeviceSession for RecordingSession {
        fn enter_config_mode(&mut self) -> Result<String> {
            self.record("configure", "[edit]")
        }

        fn send_config_set(&mut self, commands: &[String]) -> Result<String> {
            self.calls
                .borrow_mut()
                .extend(commands.iter().map(|c| format!("send {}", c)));
            self.record("send_config_set", "loaded")
        }

        fn pending_diff(&mut self) -> Result<String> {
            self.record("show | compare", "+ neighbor 192.0.2.1")
        }

        fn commit(&mut self) -> Result<String> {
            self.record("commit", "commit complete")
        }

        fn discard(&mut self) -> Result<String> {
            self.record("discard", "")
        }

        fn exit_config_mode(&mut self) -> Result<String> {
            self.record("exit", "")
        }

        fn close(&mut self) {
            self.calls.borrow_mut().push("close".to_string());
        }
    }

    fn config() -> RenderedConfig {
        RenderedConfig::from_stanzas(vec![
            "set a\nset b\n".to_string(),
            "set c\n".to_string(),
        ])
    }

    #[test]
    fn test_commit_on_yes() {
        let session = RecordingSession::default();
        let mut prompter = ScriptedPrompter::new(&["  YES  "]);

        let outcome = push_peering(session.clone(), &config(), &mut prompter).unwrap();

        assert_eq!(outcome, Outcome::Committed);
        assert_eq!(
            session.calls(),
            vec![
                "configure",
                "send set a",
                "send set b",
                "send set c",
                "send_config_set",
                "show | compare",
                "commit",
                "close",
            ]
        );
        assert_eq!(prompter.said[0], "loaded\n+ neighbor 192.0.2.1");
        assert_eq!(prompter.said[1], "commit complete");
    }

    #[test]
    fn test_discard_on_anything_else() {
        for answer in ["y", "", "no"] {
            let session = RecordingSession::default();
            let mut prompter = ScriptedPrompter::new(&[answer]);

            let outcome = push_peering(session.clone(), &config(), &mut prompter).unwrap();

            assert_eq!(outcome, Outcome::Discarded);
            let calls = session.calls();
            assert!(!calls.contains(&"commit".to_string()));
            assert_eq!(&calls[calls.len() - 2..], ["discard", "close"]);
            assert_eq!(
                prompter.said.last().unwrap(),
                "Changes not confirmed. Exiting without committing."
            );
        }
    }

    #[test]
    fn test_session_closed_when_config_mode_refused() {
        let session = RecordingSession::failing("configure");
        let mut prompter = ScriptedPrompter::new(&["yes"]);

        let err = push_peering(session.clone(), &config(), &mut prompter).unwrap_err();

        assert!(matches!(err, Error::DeviceState(_)));
        assert_eq!(session.calls(), vec!["configure", "close"]);
        assert!(prompter.prompts.is_empty());
    }

    #[test]
    fn test_session_closed_when_diff_fails() {
        let session = RecordingSession::failing("show | compare");
        let mut prompter = ScriptedPrompter::new(&["yes"]);

        assert!(push_peering(session.clone(), &config(), &mut prompter).is_err());
        assert_eq!(session.calls().last().unwrap(), "close");
        assert!(!session.calls().contains(&"commit".to_string()));
    }

    #[test]
    fn test_session_closed_when_prompt_input_ends() {
        let session = RecordingSession::default();
        let mut prompter = ScriptedPrompter::new(&[]);

        assert!(push_peering(session.clone(), &config(), &mut prompter).is_err());
        assert_eq!(session.calls().last().unwrap(), "close");
    }

    #[test]
    fn test_push_ports_has_no_commit_gate() {
        let session = RecordingSession::default();
        let mut prompter = ScriptedPrompter::new(&[]);

        push_ports(session.clone(), &config(), &mut prompter).unwrap();

        let calls = session.calls();
        assert_eq!(calls.first().unwrap(), "configure");
        assert_eq!(&calls[calls.len() - 2..], ["exit", "close"]);
        assert!(!calls.iter().any(|c| c == "show | compare" || c == "commit"));
        assert!(prompter.prompts.is_empty());
        assert_eq!(prompter.said, vec!["loaded"]);
    }

    #[test]
    fn test_out_of_order_calls_rejected() {
        let session = RecordingSession::default();
        let mut txn = ConfigTransaction::begin(session.clone()).unwrap();
        assert_eq!(txn.state(), TransactionState::ConfigMode);

        assert!(txn.pending_diff().is_err());
        txn.submit(&config()).unwrap();
        assert_eq!(txn.state(), TransactionState::Submitted);
        assert!(txn.submit(&config()).is_err());

        drop(txn);
        assert_eq!(session.calls().last().unwrap(), "close");
    }
}
