pub mod calculator;
pub mod tasklet;
