pub mod bank;
pub mod covenant;
pub mod dataset;
pub mod facility;
pub mod ids;
pub mod loan;
pub mod record;
