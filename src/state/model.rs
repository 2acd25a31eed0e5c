/// Lifecycle of one crop editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Closed,
    /// Waiting for the image's natural size.
    Loading,
    Ready,
    /// The image never loaded; only cancel is possible.
    Failed,
}

impl SessionState {
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub const fn can_confirm(self) -> bool {
        matches!(self, Self::Ready)
    }
}
