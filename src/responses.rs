use atat::AtatResp;

/// Placeholder response of all commands, as the module replies are never evaluated
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoResponse;

impl AtatResp for NoResponse {}
