use clap::Parser;
use ds620::{Ds620, SensorId};

/// Read temperatures from a DS620 sensor in one-shot mode
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to I2C bus (e.g., /dev/i2c-1)
    #[arg(short, long)]
    path: String,
    /// Sensor index set by the A2..A0 strap pins (0-7)
    #[arg(short, long, default_value_t = 0)]
    sensor: u8,
}

fn main() {
    // Initialize the logger
    env_logger::init();
    // Parse command line arguments
    let args = Args::parse();
    let id = SensorId::try_from(args.sensor).expect("Sensor index must be 0-7");
    // Open the I2C bus
    let i2c = linux_embedded_hal::I2cdev::new(&args.path).expect("Failed to open I2C device");
    let delay = linux_embedded_hal::Delay;
    // Create a DS620 instance
    let mut sensor = Ds620::new(i2c, delay, id);
    // Switch to one-shot mode, preserving the device's status bits
    let config = sensor.config().expect("Failed to read configuration");
    sensor
        .set_config(config.with_oneshot(true))
        .expect("Failed to write configuration");
    log::info!("Sensor {} at resolution {:?}", id.index(), config.resolution());
    loop {
        // Trigger a conversion and wait for the DONE flag
        sensor.start_conversion().expect("Failed to start conversion");
        sensor
            .wait_conversion_done()
            .expect("Conversion did not complete");
        // Read the temperature register
        let temp = sensor.temperature().expect("Failed to read temperature");
        log::info!("Temperature: {}", temp);
    }
}
