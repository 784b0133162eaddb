pub mod traditional;
