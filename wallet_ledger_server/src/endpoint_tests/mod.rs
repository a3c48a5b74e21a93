mod deposits;
mod helpers;
mod transfers;
