pub mod days;
pub mod health;
pub mod leaderboard;
pub mod sessions;
pub mod users;
