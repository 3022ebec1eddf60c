mod account;
mod ddragon;
mod league;
mod spectator;
mod summoner;
