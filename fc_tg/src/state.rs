/// Where a user is in the entry form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormState {
    #[default]
    Idle,
    SelectPair,
    SelectPosition,
    EntryPrice,
    StopLoss,
    RiskAmount,
    TakeProfit,
}

impl FormState {
    /// The six form steps in the order they are asked
    pub const STEPS: [FormState; 6] = [
        FormState::SelectPair,
        FormState::SelectPosition,
        FormState::EntryPrice,
        FormState::StopLoss,
        FormState::RiskAmount,
        FormState::TakeProfit,
    ];

    /// State reached after valid input in this state
    pub fn next(self) -> FormState {
        match self {
            FormState::Idle => FormState::SelectPair,
            FormState::SelectPair => FormState::SelectPosition,
            FormState::SelectPosition => FormState::EntryPrice,
            FormState::EntryPrice => FormState::StopLoss,
            FormState::StopLoss => FormState::RiskAmount,
            FormState::RiskAmount => FormState::TakeProfit,
            FormState::TakeProfit => FormState::Idle,
        }
    }

    /// 1-based position in the form, `None` when idle
    pub fn step_number(self) -> Option<usize> {
        Self::STEPS.iter().position(|step| *step == self).map(|index| index + 1)
    }

    pub fn is_idle(self) -> bool {
        self == FormState::Idle
    }
}
