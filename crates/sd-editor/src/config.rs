use sd_core::Position;

/// Tunables for a designer session.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignerConfig {
    /// Where `add` places new elements. Default: **(100, 100)**.
    pub spawn_position: Position,

    /// Offset of a duplicate from its original. Default: **(20, 20)**.
    pub duplicate_offset: (f64, f64),

    /// Entries kept by the status log before the oldest are dropped.
    /// Default: **200**.
    pub status_capacity: usize,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            spawn_position: Position::new(100.0, 100.0),
            duplicate_offset: (20.0, 20.0),
            status_capacity: 200,
        }
    }
}
