pub mod clock;
pub mod providers;
pub mod recommendations;
