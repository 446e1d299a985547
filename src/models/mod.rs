pub mod daily_log;
pub mod leaderboard;
pub mod user;
pub mod workout_log;
