/// Axis layer: unit conversion, linear rescaling, tick labels.
///
/// ```text
///   sample index ──DomainConverter──▶ seconds / Hertz
///   pixel 0..extent ──scale──▶ natural range ──scale──▶ requested range
///                                                      │
///                                                      ▼
///                                                   TickSet
/// ```

pub mod domain;
pub mod scale;
pub mod ticks;
