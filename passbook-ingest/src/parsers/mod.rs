pub mod icici;
