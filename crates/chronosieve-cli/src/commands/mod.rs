//! Command implementations.

pub mod check;
pub mod gauntlet;
pub mod run;
pub mod sieves;

pub use self::check::execute_check;
pub use self::gauntlet::execute_gauntlet;
pub use self::run::execute_run;
pub use self::sieves::execute_sieves;
