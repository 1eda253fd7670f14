pub mod cli;
mod database;
mod health;
mod http_err;
mod ledger;
mod models;
mod repos;
mod server;
