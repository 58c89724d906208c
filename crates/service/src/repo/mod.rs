pub mod seaorm;

pub use seaorm::SeaOrmRepository;
