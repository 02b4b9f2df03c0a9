use fc_calc::CalcError;
use fc_calc::PositionCalculator;
use fc_calc::PositionSide;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::error::BotError;
use crate::menu::Event;
use crate::menu::Keyboard;
use crate::messages;
use crate::session::Session;
use crate::session::SessionStore;
use crate::state::FormState;

/// Text plus keyboard to send back to the user
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Keyboard,
}

impl Reply {
    pub fn new(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self { text: text.into(), keyboard }
    }

    /// Generic message for errors caught at the dispatch boundary
    pub fn failure() -> Self {
        Self::new(messages::failure(), Keyboard::MainMenu)
    }
}

/// Drives the entry form for every user. Transport independent: feed it
/// `(user_id, text)` and send back the returned [`Reply`].
pub struct ConversationController<C> {
    sessions: SessionStore,
    calculator: C,
    popular_pairs: Vec<String>,
}

impl<C: PositionCalculator> ConversationController<C> {
    pub fn new(calculator: C, popular_pairs: Vec<String>) -> Self {
        Self { sessions: SessionStore::new(), calculator, popular_pairs }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn calculator(&self) -> &C {
        &self.calculator
    }

    /// Route one incoming text message
    pub fn handle(&self, user_id: u64, text: &str) -> Result<Reply, BotError> {
        match Event::classify(text) {
            Event::Start => Ok(self.on_start(user_id)),
            Event::NewEntry => Ok(self.on_new_entry(user_id)),
            Event::Help => Ok(self.on_help(user_id)),
            Event::Cancel => Ok(self.on_cancel(user_id)),
            Event::UnknownCommand(command) => Ok(self.reply_in_place(user_id, messages::unknown_command(command))),
            Event::Text(input) => match self.sessions.state(user_id) {
                FormState::Idle => Ok(self.reply_in_place(user_id, messages::idle_hint())),
                FormState::SelectPair => Ok(self.on_select_pair(user_id, input)),
                FormState::SelectPosition => Ok(self.on_select_position(user_id, input)),
                FormState::EntryPrice => Ok(self.on_entry_price(user_id, input)),
                FormState::StopLoss => Ok(self.on_stop_loss(user_id, input)),
                FormState::RiskAmount => Ok(self.on_risk_amount(user_id, input)),
                FormState::TakeProfit => self.on_take_profit(user_id, input),
            },
        }
    }

    /// Reset to idle and show the main menu
    pub fn on_start(&self, user_id: u64) -> Reply {
        self.sessions.with_session(user_id, Session::reset);
        info!(user_id, "Main menu requested");
        Reply::new(messages::main_menu(), Keyboard::MainMenu)
    }

    /// Clear any draft and ask for the pair
    pub fn on_new_entry(&self, user_id: u64) -> Reply {
        self.sessions.with_session(user_id, |session| {
            session.begin();
            info!(user_id, "New entry started");
            self.prompt_reply(session)
        })
    }

    pub fn on_select_pair(&self, user_id: u64, text: &str) -> Reply {
        self.advance(user_id, FormState::SelectPair, |session| {
            session.pair = Some(fc_calc::parse_pair(text)?);
            Ok(())
        })
    }

    pub fn on_select_position(&self, user_id: u64, text: &str) -> Reply {
        self.advance(user_id, FormState::SelectPosition, |session| {
            session.side = Some(text.parse::<PositionSide>()?);
            Ok(())
        })
    }

    pub fn on_entry_price(&self, user_id: u64, text: &str) -> Reply {
        self.advance(user_id, FormState::EntryPrice, |session| {
            session.entry_price = Some(fc_calc::parse_positive("Entry price", text)?);
            Ok(())
        })
    }

    pub fn on_stop_loss(&self, user_id: u64, text: &str) -> Reply {
        self.advance(user_id, FormState::StopLoss, |session| {
            let stop_loss = fc_calc::parse_positive("Stop-loss", text)?;
            if let (Some(side), Some(entry)) = (session.side, session.entry_price) {
                fc_calc::validate_stop_loss(side, entry, stop_loss)?;
            }
            session.stop_loss = Some(stop_loss);
            Ok(())
        })
    }

    pub fn on_risk_amount(&self, user_id: u64, text: &str) -> Reply {
        self.advance(user_id, FormState::RiskAmount, |session| {
            session.risk_amount = Some(fc_calc::parse_positive("Risk amount", text)?);
            Ok(())
        })
    }

    /// Last step: store the target, run the calculator once and go back to idle
    pub fn on_take_profit(&self, user_id: u64, text: &str) -> Result<Reply, BotError> {
        self.sessions.with_session(user_id, |session| {
            if session.state != FormState::TakeProfit {
                return Ok(self.out_of_order(session, FormState::TakeProfit));
            }

            let parsed = fc_calc::parse_positive("Take-profit", text).and_then(|value| match (session.side, session.entry_price) {
                (Some(side), Some(entry)) => fc_calc::validate_take_profit(side, entry, value),
                _ => Ok(value),
            });

            let take_profit = match parsed {
                Ok(value) => value,
                Err(err) => return Ok(self.invalid(session, &err)),
            };
            session.take_profit = Some(take_profit);

            let Some(setup) = session.to_setup() else {
                session.reset();
                return Err(BotError::IncompleteSession { user_id });
            };

            match self.calculator.calculate(&setup) {
                Ok(report) => {
                    info!(user_id, pair = %setup.pair, side = %setup.side, "Trade calculation completed");
                    let text = messages::report(&report);
                    session.last_report = Some(report);
                    session.state = FormState::TakeProfit.next();
                    Ok(Reply::new(text, Keyboard::MainMenu))
                }
                Err(err @ CalcError::ResultOutOfRange) => {
                    warn!(user_id, pair = %setup.pair, "Trade calculation out of range");
                    session.reset();
                    Ok(Reply::new(messages::calculation_rejected(&err.to_string()), Keyboard::MainMenu))
                }
                Err(err) => {
                    session.reset();
                    Err(BotError::Calculation(err))
                }
            }
        })
    }

    /// Abort the form from any state
    pub fn on_cancel(&self, user_id: u64) -> Reply {
        self.sessions.with_session(user_id, |session| {
            let was = session.state;
            session.reset();

            if was.is_idle() {
                Reply::new(messages::nothing_to_cancel(), Keyboard::MainMenu)
            } else {
                info!(user_id, state = ?was, "Entry cancelled");
                Reply::new(messages::cancelled(), Keyboard::MainMenu)
            }
        })
    }

    /// Usage text; leaves the session untouched
    pub fn on_help(&self, user_id: u64) -> Reply {
        let state = self.sessions.state(user_id);
        Reply::new(messages::help(), Keyboard::for_state(state, &self.popular_pairs))
    }

    /// Reply to a message that carries no text
    pub fn on_unsupported(&self, user_id: u64) -> Reply {
        self.reply_in_place(user_id, messages::text_only().to_string())
    }

    /// Validate input for `expected` and move to the next state, or re-prompt
    fn advance<F>(&self, user_id: u64, expected: FormState, apply: F) -> Reply
    where
        F: FnOnce(&mut Session) -> Result<(), CalcError>,
    {
        self.sessions.with_session(user_id, |session| {
            if session.state != expected {
                return self.out_of_order(session, expected);
            }

            match apply(session) {
                Ok(()) => {
                    session.state = expected.next();
                    debug!(user_id, state = ?session.state, "Form advanced");
                    self.prompt_reply(session)
                }
                Err(err) => self.invalid(session, &err),
            }
        })
    }

    fn invalid(&self, session: &Session, err: &CalcError) -> Reply {
        debug!(user_id = session.user_id, state = ?session.state, "Rejected input: {err}");
        Reply::new(messages::invalid_input(&err.to_string(), session), self.keyboard(session.state))
    }

    fn out_of_order(&self, session: &Session, expected: FormState) -> Reply {
        warn!(user_id = session.user_id, expected = ?expected, actual = ?session.state, "Step handler called out of order");
        self.prompt_reply(session)
    }

    fn prompt_reply(&self, session: &Session) -> Reply {
        Reply::new(messages::prompt(session), self.keyboard(session.state))
    }

    fn reply_in_place(&self, user_id: u64, text: String) -> Reply {
        Reply::new(text, self.keyboard(self.sessions.state(user_id)))
    }

    fn keyboard(&self, state: FormState) -> Keyboard {
        Keyboard::for_state(state, &self.popular_pairs)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use fc_calc::CalculatorConfig;
    use fc_calc::FuturesCalculator;
    use fc_calc::TradeReport;
    use fc_calc::TradeSetup;

    use super::*;
    use crate::menu::BACK_BUTTON;
    use crate::menu::HELP_BUTTON;
    use crate::menu::LONG_BUTTON;
    use crate::menu::NEW_ENTRY_BUTTON;
    use crate::menu::SHORT_BUTTON;

    const USER: u64 = 42;

    /// Wraps the real calculator and counts invocations
    #[derive(Default)]
    struct CountingCalculator {
        inner: FuturesCalculator,
        calls: AtomicUsize,
    }

    impl CountingCalculator {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::Relaxed)
        }
    }

    impl PositionCalculator for CountingCalculator {
        fn calculate(&self, setup: &TradeSetup) -> fc_calc::Result<TradeReport> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            self.inner.calculate(setup)
        }
    }

    struct FailingCalculator;

    impl PositionCalculator for FailingCalculator {
        fn calculate(&self, _setup: &TradeSetup) -> fc_calc::Result<TradeReport> {
            Err(CalcError::InvalidConfig("broken"))
        }
    }

    fn new_controller() -> ConversationController<CountingCalculator> {
        ConversationController::new(CountingCalculator::default(), vec!["BTCUSDT".to_string(), "ETHUSDT".to_string()])
    }

    fn send<C: PositionCalculator>(controller: &ConversationController<C>, text: &str) -> Reply {
        controller.handle(USER, text).unwrap()
    }

    fn state<C: PositionCalculator>(controller: &ConversationController<C>) -> FormState {
        controller.sessions().state(USER)
    }

    /// Drive the form up to (not including) the answer for `target`
    fn walk_to<C: PositionCalculator>(controller: &ConversationController<C>, target: FormState) {
        let answers = ["btcusdt", LONG_BUTTON, "100", "95", "50", "115"];
        send(controller, NEW_ENTRY_BUTTON);
        for (step, answer) in FormState::STEPS.iter().zip(answers) {
            if *step == target {
                break;
            }
            send(controller, answer);
        }
        assert_eq!(state(controller), target);
    }

    #[test]
    fn test_full_long_flow() {
        let controller = new_controller();

        let reply = send(&controller, "/start");
        assert_eq!(reply.keyboard, Keyboard::MainMenu);
        assert_eq!(state(&controller), FormState::Idle);

        let reply = send(&controller, NEW_ENTRY_BUTTON);
        assert_eq!(state(&controller), FormState::SelectPair);
        assert_eq!(reply.keyboard, Keyboard::Pairs(vec!["BTCUSDT".to_string(), "ETHUSDT".to_string()]));

        let reply = send(&controller, "btcusdt");
        assert_eq!(state(&controller), FormState::SelectPosition);
        assert_eq!(reply.keyboard, Keyboard::PositionSide);

        send(&controller, LONG_BUTTON);
        assert_eq!(state(&controller), FormState::EntryPrice);
        send(&controller, "100");
        assert_eq!(state(&controller), FormState::StopLoss);
        send(&controller, "95");
        assert_eq!(state(&controller), FormState::RiskAmount);
        send(&controller, "50");
        assert_eq!(state(&controller), FormState::TakeProfit);

        let reply = send(&controller, "115");
        assert_eq!(state(&controller), FormState::Idle);
        assert_eq!(reply.keyboard, Keyboard::MainMenu);
        assert!(reply.text.contains("TRADE CALCULATION"));
        assert_eq!(controller.calculator().calls(), 1);

        let session = controller.sessions().get(USER).unwrap();
        assert_eq!(session.pair.as_deref(), Some("BTCUSDT"));
        assert_eq!(session.side, Some(PositionSide::Long));
        assert_eq!(session.entry_price, Some(100.0));
        assert_eq!(session.stop_loss, Some(95.0));
        assert_eq!(session.risk_amount, Some(50.0));
        assert_eq!(session.take_profit, Some(115.0));
        assert!((session.last_report.unwrap().position_size - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_full_short_flow() {
        let controller = new_controller();

        for text in [NEW_ENTRY_BUTTON, "ETHUSDT", SHORT_BUTTON, "2000", "2100", "100", "1800"] {
            send(&controller, text);
        }

        assert_eq!(state(&controller), FormState::Idle);
        assert_eq!(controller.calculator().calls(), 1);
        assert_eq!(controller.sessions().get(USER).unwrap().side, Some(PositionSide::Short));
    }

    #[test]
    fn test_cancel_from_every_step() {
        for step in FormState::STEPS {
            for cancel in [BACK_BUTTON, "cancel", "/cancel"] {
                let controller = new_controller();
                walk_to(&controller, step);

                let reply = send(&controller, cancel);

                assert_eq!(state(&controller), FormState::Idle, "cancel at {step:?}");
                assert_eq!(reply.keyboard, Keyboard::MainMenu);
                assert_eq!(controller.calculator().calls(), 0);
                assert!(controller.sessions().get(USER).unwrap().to_setup().is_none());
            }
        }
    }

    #[test]
    fn test_cancel_when_idle() {
        let controller = new_controller();
        let reply = send(&controller, "cancel");
        assert_eq!(reply.text, messages::nothing_to_cancel());
        assert_eq!(state(&controller), FormState::Idle);
    }

    #[test]
    fn test_non_numeric_input_does_not_advance() {
        let numeric = [FormState::EntryPrice, FormState::StopLoss, FormState::RiskAmount, FormState::TakeProfit];

        for step in numeric {
            let controller = new_controller();
            walk_to(&controller, step);

            for junk in ["abc", "12abc", "-5", "0", ""] {
                let reply = send(&controller, junk);
                assert_eq!(state(&controller), step, "input {junk:?} at {step:?}");
                assert!(reply.text.starts_with("❌"));
                assert_eq!(reply.keyboard, Keyboard::Back);
            }
            assert_eq!(controller.calculator().calls(), 0);
        }
    }

    #[test]
    fn test_wrong_side_prices_are_rejected() {
        let controller = new_controller();
        walk_to(&controller, FormState::StopLoss);

        // Long entry at 100: stop above entry is invalid
        let reply = send(&controller, "105");
        assert_eq!(state(&controller), FormState::StopLoss);
        assert!(reply.text.contains("below"));

        send(&controller, "95");
        send(&controller, "50");
        let reply = send(&controller, "90");
        assert_eq!(state(&controller), FormState::TakeProfit);
        assert!(reply.text.contains("Take-profit must be above"));
        assert_eq!(controller.calculator().calls(), 0);
    }

    #[test]
    fn test_invalid_pair_and_side_reprompt() {
        let controller = new_controller();
        send(&controller, NEW_ENTRY_BUTTON);

        send(&controller, "not a pair");
        assert_eq!(state(&controller), FormState::SelectPair);

        send(&controller, "SOLUSDT");
        let reply = send(&controller, "sideways");
        assert_eq!(state(&controller), FormState::SelectPosition);
        assert_eq!(reply.keyboard, Keyboard::PositionSide);
    }

    #[test]
    fn test_start_shows_two_options_from_any_state() {
        for step in FormState::STEPS {
            let controller = new_controller();
            walk_to(&controller, step);

            let reply = send(&controller, "/start");

            assert_eq!(state(&controller), FormState::Idle);
            assert_eq!(reply.keyboard.rows().iter().map(Vec::len).sum::<usize>(), 2);
        }
    }

    #[test]
    fn test_help_never_mutates_session() {
        let controller = new_controller();
        send(&controller, HELP_BUTTON);
        assert_eq!(state(&controller), FormState::Idle);

        for step in FormState::STEPS {
            let controller = new_controller();
            walk_to(&controller, step);
            let before = controller.sessions().get(USER);

            for help in [HELP_BUTTON, "/help"] {
                let reply = send(&controller, help);
                assert!(reply.text.contains("HOW TO USE"));
            }

            assert_eq!(controller.sessions().get(USER), before);
        }
    }

    #[test]
    fn test_idle_text_and_unknown_command_keep_state() {
        let controller = new_controller();
        let reply = send(&controller, "hello");
        assert_eq!(state(&controller), FormState::Idle);
        assert_eq!(reply.keyboard, Keyboard::MainMenu);

        walk_to(&controller, FormState::EntryPrice);
        let reply = send(&controller, "/foo");
        assert_eq!(state(&controller), FormState::EntryPrice);
        assert!(reply.text.contains("/foo"));
    }

    #[test]
    fn test_new_entry_restarts_form() {
        let controller = new_controller();
        walk_to(&controller, FormState::RiskAmount);

        send(&controller, NEW_ENTRY_BUTTON);

        let session = controller.sessions().get(USER).unwrap();
        assert_eq!(session.state, FormState::SelectPair);
        assert!(session.pair.is_none());
        assert!(session.entry_price.is_none());
    }

    #[test]
    fn test_sessions_are_per_user() {
        let controller = new_controller();
        walk_to(&controller, FormState::StopLoss);

        controller.handle(7, NEW_ENTRY_BUTTON).unwrap();

        assert_eq!(controller.sessions().state(7), FormState::SelectPair);
        assert_eq!(state(&controller), FormState::StopLoss);
    }

    #[test]
    fn test_step_handler_out_of_order_is_ignored() {
        let controller = new_controller();
        walk_to(&controller, FormState::EntryPrice);

        controller.on_risk_amount(USER, "50");

        let session = controller.sessions().get(USER).unwrap();
        assert_eq!(session.state, FormState::EntryPrice);
        assert!(session.risk_amount.is_none());
    }

    #[test]
    fn test_calculator_failure_resets_session() {
        let controller = ConversationController::new(FailingCalculator, Vec::new());
        walk_to(&controller, FormState::TakeProfit);

        let result = controller.handle(USER, "115");

        assert!(matches!(result, Err(BotError::Calculation(_))));
        assert_eq!(state(&controller), FormState::Idle);
    }

    #[test]
    fn test_stop_too_close_to_entry_reprompts() {
        let controller = new_controller();
        walk_to(&controller, FormState::StopLoss);

        let reply = send(&controller, "99.99999999999999");

        assert_eq!(state(&controller), FormState::StopLoss);
        assert!(reply.text.contains("too close"));
        assert!(controller.sessions().get(USER).unwrap().stop_loss.is_none());
    }

    #[test]
    fn test_out_of_range_result_is_not_reported() {
        let controller = new_controller();

        let mut reply = send(&controller, NEW_ENTRY_BUTTON);
        for text in ["BTCUSDT", "long", "100", "99.99", "1e305", "200"] {
            reply = send(&controller, text);
        }

        assert_eq!(state(&controller), FormState::Idle);
        assert_eq!(reply.keyboard, Keyboard::MainMenu);
        assert!(reply.text.contains("too large"));
        assert!(!reply.text.contains("inf"));
        assert!(!reply.text.contains("NaN"));
        assert!(controller.sessions().get(USER).unwrap().last_report.is_none());
    }

    #[test]
    fn test_failure_reply_returns_to_main_menu() {
        let reply = Reply::failure();
        assert_eq!(reply.text, messages::failure());
        assert_eq!(reply.keyboard, Keyboard::MainMenu);
    }

    #[test]
    fn test_real_calculator_with_fees() {
        let calculator = FuturesCalculator::new(CalculatorConfig { leverage: 20.0, taker_fee_bps: 5.0 }).unwrap();
        let controller = ConversationController::new(calculator, Vec::new());

        for text in [NEW_ENTRY_BUTTON, "BTCUSDT", "long", "64 000", "63000", "100", "67000"] {
            controller.handle(USER, text).unwrap();
        }

        let report = controller.sessions().get(USER).unwrap().last_report.unwrap();
        assert!((report.position_size - 0.1).abs() < 1e-12);
        assert!((report.risk_reward - 3.0).abs() < 1e-12);
        assert!(report.net_profit < report.gross_profit);
    }
}
