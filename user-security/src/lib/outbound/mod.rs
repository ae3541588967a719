pub mod managers;
