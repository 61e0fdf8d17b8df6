pub mod analysis;
pub mod bar;
pub mod fundamentals;
pub mod indicator;
pub mod period;

pub use analysis::*;
pub use bar::*;
pub use fundamentals::*;
pub use indicator::*;
pub use period::*;
