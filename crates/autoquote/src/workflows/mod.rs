pub mod insurance;
