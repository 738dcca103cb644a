mod attitude_computer;


pub use attitude_computer::AttitudeComputer;
