pub mod days;
pub mod leaderboard;
