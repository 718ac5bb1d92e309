use thorlabs_mc1000a::{Mc1000a, StdoutObserver};

fn main() {
    // Show the driver's log output, e.g., with `RUST_LOG=debug`.
    env_logger::init();

    let port = "/dev/ttyUSB0";

    // Open the chopper with verbose output, then print the screens to stdout.
    let mut chopper = Mc1000a::open(port, true).expect("Failed to open serial port");
    chopper.set_observer(StdoutObserver);

    // Show the current terminal screen of the instrument
    chopper.print_terminal().unwrap();

    // Set the chopping rate and start the wheel
    chopper.set_spin_rate(250).unwrap();
    chopper.start_spin().unwrap();

    println!("Spinning: {}", chopper.get_spin_state().unwrap());
    println!(
        "Chopping rate: {} Hz",
        chopper.get_chopping_frequency().unwrap().as_hertz()
    );

    // Stop the wheel again and close the connection
    chopper.stop_spin().unwrap();
    chopper.close();
}
