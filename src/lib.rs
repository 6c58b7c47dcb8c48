pub mod cli;
pub mod form;
pub mod io;
pub mod logging;
pub mod model;
pub mod ops;
pub mod toast;
pub mod util;
