mod commands;
mod wifi;
