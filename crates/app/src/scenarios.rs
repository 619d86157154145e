//! Classroom scenarios.
//!
//! Each scenario wires a small network, drives traffic through it, folds the
//! protocol reports into the run's `Metrics`, and returns the topology so the
//! driver can count domains and render it.

use crate::config::Config;
use linksim_core::access_control::CsmaCd;
use linksim_core::error::Result;
use linksim_core::error_control::ensure_parity;
use linksim_core::flow_control::SlidingWindow;
use linksim_core::metrics::Metrics;
use linksim_core::physical::{Connection, Hub};
use linksim_core::{Bridge, Device, Endpoint, ForwardingNode, LinkConditions, Switch, Topology};
use log::{info, warn};
use std::rc::Rc;

/// A finished scenario.
pub struct Outcome {
    pub title: &'static str,
    pub file_stem: &'static str,
    pub topology: Topology,
}

/// Point-to-point connection, then a six-port hub.
pub fn physical() -> Outcome {
    let device1 = Device::shared("Device1", "PH:00:00:00:00:01");
    let device2 = Device::shared("Device2", "PH:00:00:00:00:02");
    let connection = Connection::new(device1.clone(), device2.clone());
    device1.send_over(&connection, "Hello, Device2!");

    let hub = Hub::shared("Hub1");
    let mut devices = vec![device1.clone(), device2];
    devices.extend((3..=6).map(|i| Device::shared(format!("Device{i}"), format!("PH:00:00:00:00:0{i}"))));
    for device in &devices {
        hub.connect(device.clone());
    }
    device1.send_over(&*hub, "Hello, everyone!");

    let mut topology = Topology::new();
    let h = topology.add(&*hub);
    for device in &devices {
        let id = topology.add(&**device);
        topology.link(id, h);
    }

    Outcome {
        title: "Physical Layer: Hub Topology",
        file_stem: "physical",
        topology,
    }
}

/// Five devices on a switch: parity gate, CSMA/CD, then a sliding-window transfer.
pub fn datalink(config: &Config, conditions: &mut dyn LinkConditions, metrics: &mut Metrics) -> Result<Outcome> {
    let mut switch = Switch::new("Switch1");
    let devices: Vec<_> = (1..=5)
        .map(|i| Device::shared(format!("D{i}"), format!("AA:BB:CC:DD:EE:0{i}")))
        .collect();
    for device in &devices {
        switch.connect(device.clone(), device.mac().clone());
    }

    info!("Running Parity Check...");
    match ensure_parity(&config.payload) {
        Ok(()) => {
            metrics.record_parity(true);
            info!("Parity Check Passed, attempting CSMA/CD...");
            let report = CsmaCd::new().transmit(
                conditions,
                &devices[0],
                &mut switch,
                devices[1].mac(),
                &config.payload,
            )?;
            metrics.record_transmit(&report);
        }
        Err(e) => {
            metrics.record_parity(false);
            warn!("{e}; not sending");
        }
    }

    info!("Running Sliding Window Protocol...");
    let report = SlidingWindow::new(config.window)?.transfer(
        conditions,
        &devices[0],
        &mut switch,
        devices[2].mac(),
        &config.frames,
    )?;
    metrics.record_transfer(&report);
    metrics.record_forwarding(&switch.stats());

    let mut topology = Topology::new();
    let s = topology.add(&switch);
    for device in &devices {
        let id = topology.add(&**device);
        topology.link(id, s);
    }

    Ok(Outcome {
        title: "Data Link Layer: Switch Topology",
        file_stem: "datalink",
        topology,
    })
}

/// Two five-device hub stars joined by a switch.
pub fn extended(conditions: &mut dyn LinkConditions, metrics: &mut Metrics) -> Result<Outcome> {
    let hub1 = Hub::shared("Hub1");
    let hub2 = Hub::shared("Hub2");
    let mut switch = Switch::new("MainSwitch");

    let devices1: Vec<_> = (1..=5)
        .map(|i| Device::shared(format!("H1_D{i}"), format!("AA:BB:CC:DD:11:0{i}")))
        .collect();
    let devices2: Vec<_> = (1..=5)
        .map(|i| Device::shared(format!("H2_D{i}"), format!("AA:BB:CC:DD:22:0{i}")))
        .collect();
    for device in &devices1 {
        hub1.connect(device.clone());
    }
    for device in &devices2 {
        hub2.connect(device.clone());
    }

    switch.connect(hub1.clone(), "AA:BB:CC:DD:11:00");
    switch.connect(hub2.clone(), "AA:BB:CC:DD:22:00");

    info!("Devices connected to Hub1: {:?}", hub1.member_names());
    info!("Devices connected to Hub2: {:?}", hub2.member_names());
    info!("Switch MAC table: {:?}", switch.table());

    let report = CsmaCd::new().transmit(
        conditions,
        &devices1[0],
        &mut switch,
        devices2[0].mac(),
        "Hello from H1 to H2",
    )?;
    metrics.record_transmit(&report);
    metrics.record_forwarding(&switch.stats());

    let mut topology = Topology::new();
    let s = topology.add(&switch);
    for (hub, devices) in [(&hub1, &devices1), (&hub2, &devices2)] {
        let h = topology.add(&**hub);
        for device in devices {
            let id = topology.add(&**device);
            topology.link(id, h);
        }
        topology.link(h, s);
    }

    Ok(Outcome {
        title: "Extended Network: Two Star Topologies with Switch",
        file_stem: "extended",
        topology,
    })
}

/// Two segments joined by a bridge: one known destination, one unknown.
pub fn bridge(conditions: &mut dyn LinkConditions, metrics: &mut Metrics) -> Result<Outcome> {
    let left: Vec<_> = (1..=3)
        .map(|i| Device::shared(format!("L{i}"), format!("AA:BB:CC:DD:33:0{i}")))
        .collect();
    let right: Vec<_> = (1..=3)
        .map(|i| Device::shared(format!("R{i}"), format!("AA:BB:CC:DD:44:0{i}")))
        .collect();

    let mut bridge = Bridge::new("Bridge1");
    for side in [&left, &right] {
        let endpoints: Vec<Rc<dyn Endpoint>> = side.iter().map(|d| d.clone() as Rc<dyn Endpoint>).collect();
        let addresses: Vec<_> = side.iter().map(|d| d.mac().clone()).collect();
        bridge.connect_segment_zip(&endpoints, &addresses);
    }

    let csma = CsmaCd::new();
    let report = csma.transmit(conditions, &left[0], &mut bridge, right[2].mac(), "Across the bridge")?;
    metrics.record_transmit(&report);
    let report = csma.transmit(
        conditions,
        &right[0],
        &mut bridge,
        &"AA:BB:CC:DD:55:01".into(),
        "Anyone there?",
    )?;
    metrics.record_transmit(&report);
    metrics.record_forwarding(&bridge.stats());

    let mut topology = Topology::new();
    let b = topology.add(&bridge);
    for device in left.iter().chain(right.iter()) {
        let id = topology.add(&**device);
        topology.link(id, b);
    }

    Ok(Outcome {
        title: "Bridge Between Two Segments",
        file_stem: "bridge",
        topology,
    })
}
