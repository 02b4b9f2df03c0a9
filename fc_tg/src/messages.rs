use fc_calc::PositionSide;
use fc_calc::TradeReport;

use crate::menu::BACK_BUTTON;
use crate::menu::HELP_BUTTON;
use crate::menu::NEW_ENTRY_BUTTON;
use crate::session::Session;
use crate::state::FormState;

pub fn main_menu() -> String {
    format!(
        "🤖 FUTURES TRADING CALCULATOR\n\n\
         ✅ BOT ACTIVE 24/7\n\n\
         Features:\n\
         • Position Size Calculator\n\
         • Risk/Reward Ratio\n\
         • Margin & Leverage Calculator\n\
         • PNL Calculation\n\n\
         Tap {NEW_ENTRY_BUTTON} to begin!"
    )
}

pub fn help() -> String {
    format!(
        "ℹ️ HOW TO USE\n\n\
         1. Tap {NEW_ENTRY_BUTTON}\n\
         2. Send the trading pair, e.g. BTCUSDT\n\
         3. Choose LONG or SHORT\n\
         4. Send the entry price\n\
         5. Send the stop-loss price\n\
         6. Send how much you are willing to lose (risk amount)\n\
         7. Send the take-profit price\n\n\
         The bot sizes the position so that hitting the stop-loss loses exactly the risk amount, \
         then shows margin, risk/reward and PNL after fees.\n\n\
         Numbers may use a dot or a comma as decimal separator (0.5 or 0,5).\n\
         Tap {BACK_BUTTON} or type cancel at any time to abort.\n\
         Commands: /start /new /help /cancel"
    )
}

pub fn idle_hint() -> String {
    format!("Tap {NEW_ENTRY_BUTTON} to start a calculation or {HELP_BUTTON} for instructions.")
}

pub fn cancelled() -> &'static str {
    "❌ Entry cancelled."
}

pub fn nothing_to_cancel() -> &'static str {
    "Nothing to cancel."
}

pub fn unknown_command(command: &str) -> String {
    format!("Unknown command {command}. Use /help to see what I understand.")
}

pub fn text_only() -> &'static str {
    "Please reply with a text message."
}

pub fn failure() -> &'static str {
    "⚠️ Something went wrong while processing your message. The entry was reset, please start again."
}

pub fn calculation_rejected(reason: &str) -> String {
    format!("❌ {reason}. The entry was reset, tap {NEW_ENTRY_BUTTON} to try again.")
}

/// Question asked when the session enters `session.state`
pub fn prompt(session: &Session) -> String {
    let Some(step) = session.state.step_number() else {
        return idle_hint();
    };
    let total = FormState::STEPS.len();
    let pair = session.pair.as_deref().unwrap_or("the pair");

    let question = match session.state {
        FormState::Idle => return idle_hint(),
        FormState::SelectPair => "Send the trading pair (e.g. BTCUSDT) or pick one below.".to_string(),
        FormState::SelectPosition => format!("{pair}: choose the position side, LONG or SHORT."),
        FormState::EntryPrice => format!("{pair}: send the entry price."),
        FormState::StopLoss => {
            let relation = match session.side {
                Some(PositionSide::Short) => "above",
                _ => "below",
            };
            match session.entry_price {
                Some(entry) => format!("Send the stop-loss price ({relation} {}).", format_price(entry)),
                None => "Send the stop-loss price.".to_string(),
            }
        }
        FormState::RiskAmount => "How much are you willing to lose if the stop-loss is hit? (in quote currency, e.g. USDT)".to_string(),
        FormState::TakeProfit => {
            let relation = match session.side {
                Some(PositionSide::Short) => "below",
                _ => "above",
            };
            match session.entry_price {
                Some(entry) => format!("Send the take-profit price ({relation} {}).", format_price(entry)),
                None => "Send the take-profit price.".to_string(),
            }
        }
    };

    format!("Step {step}/{total} · {question}")
}

pub fn invalid_input(reason: &str, session: &Session) -> String {
    format!("❌ {reason}\n\n{}", prompt(session))
}

pub fn report(report: &TradeReport) -> String {
    let setup = &report.setup;
    let side = match setup.side {
        PositionSide::Long => "🟢 LONG",
        PositionSide::Short => "🔴 SHORT",
    };
    let signed_pct = |price: f64| (price - setup.entry_price) / setup.entry_price * 100.0;

    format!(
        "📊 TRADE CALCULATION\n\
         {pair} {side}\n\n\
         Entry: {entry}\n\
         Stop-loss: {stop} ({stop_pct:+.2}%)\n\
         Take-profit: {target} ({target_pct:+.2}%)\n\n\
         💰 POSITION\n\
         Size: {size}\n\
         Notional: {notional:.2}\n\
         Margin @ {leverage}x: {margin:.2}\n\
         Max leverage before the stop hits liquidation: {max_leverage}x\n\n\
         ⚖️ RISK / REWARD\n\
         Risk: {risk:.2}\n\
         Reward: {reward:.2}\n\
         R:R = 1 : {rr:.2}\n\n\
         📈 PNL AFTER FEES\n\
         At take-profit: {net_profit:+.2} (fees {fees_target:.2})\n\
         At stop-loss: {net_at_stop:+.2} (fees {fees_stop:.2})",
        pair = setup.pair,
        entry = format_price(setup.entry_price),
        stop = format_price(setup.stop_loss),
        stop_pct = signed_pct(setup.stop_loss),
        target = format_price(setup.take_profit),
        target_pct = signed_pct(setup.take_profit),
        size = format_quantity(report.position_size),
        notional = report.notional,
        leverage = format_leverage(report.leverage),
        margin = report.margin,
        max_leverage = report.max_leverage,
        risk = report.gross_loss,
        reward = report.gross_profit,
        rr = report.risk_reward,
        net_profit = report.net_profit,
        fees_target = report.total_fees_at_target,
        net_at_stop = -report.net_loss,
        fees_stop = report.total_fees_at_stop,
    )
}

/// More decimals for cheaper instruments
pub fn format_price(price: f64) -> String {
    let decimals = match price.abs() {
        p if p >= 1000.0 => 2,
        p if p >= 1.0 => 4,
        p if p >= 0.01 => 6,
        _ => 8,
    };
    format!("{price:.decimals$}")
}

pub fn format_quantity(quantity: f64) -> String {
    let decimals = if quantity.abs() >= 1000.0 { 2 } else { 6 };
    format!("{quantity:.decimals$}")
}

fn format_leverage(leverage: f64) -> String {
    if leverage.fract() == 0.0 { format!("{leverage:.0}") } else { format!("{leverage:.1}") }
}
