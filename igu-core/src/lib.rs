pub mod driver;
pub mod error;
pub mod func_vect;
pub mod input_func;
pub mod phf;
pub mod rand_hash;
pub mod regvec;
pub mod solver;
pub mod variable;

#[cfg(not(target_pointer_width = "64"))]
compile_error!("Target architecture is not 64-bit - This software is only supported on 64-bit platforms");
