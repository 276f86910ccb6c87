use std::time::Duration;

use log::info;
use vexnet_serial::{
    codec::Codec,
    connection::serial::{self, DeviceType, SerialError, SerialPort},
    controller::{Buttons56, ControllerState},
};

fn main() -> Result<(), SerialError> {
    simplelog::TermLogger::init(
        log::LevelFilter::Debug,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Always,
    )
    .unwrap();

    let ports = serial::find_ports()?;
    if ports.is_empty() {
        println!("There are no serial ports available.");
        return Ok(());
    }

    println!("Available serial ports:");
    for port in &ports {
        println!(
            "{} | {}",
            port.name,
            port.description.as_deref().unwrap_or("unknown device")
        );
    }

    // Pretend to be a partner joystick holding 6D.
    let state = ControllerState {
        buttons_56: Buttons56::DOWN_6,
        ..ControllerState::neutral()
    };
    let packet = state.to_packet();

    let port = SerialPort::open(&ports[0].name, DeviceType::JoystickPartnerPort)?;
    info!("Using {}", port.name());
    let mut codec = Codec::new(port);

    for _ in 0..100 {
        codec.send(&packet);
        std::thread::sleep(Duration::from_millis(1));

        if let Some(reply) = codec.recv() {
            println!("{reply}");
        }
    }

    Ok(())
}
