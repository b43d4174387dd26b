mod common;
mod intake;
mod scoring;
