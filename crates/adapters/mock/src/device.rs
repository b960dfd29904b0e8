//! Simulated device behaviour.
//!
//! [`MockDevice::attach`] builds the module tree on a provider-created
//! [`Device`] and registers the control handlers. Handlers hold only a weak
//! reference to the device so the action tables never keep it alive.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use monika_app::update_worker::UpdateSender;
use monika_domain::control::{DeviceControl, IoletControl, ModuleControl};
use monika_domain::device::Device;
use monika_domain::error::{DispatchError, MonikaError};
use monika_domain::iolet::Iolet;
use monika_domain::kind::{IoletType, ModuleType};
use monika_domain::module::Module;

/// Shape and timing of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockSettings {
    /// Generic modules added after the fixed video and audio modules.
    pub generic_modules: usize,
    /// IOlets per generic module, alternating video in and video out.
    pub iolets_per_module: usize,
    /// Period of the clock ticker.
    pub tick_interval: Duration,
    /// Time a rebooting device stays offline.
    pub reboot_delay: Duration,
}

impl Default for MockSettings {
    fn default() -> Self {
        Self {
            generic_modules: 10,
            iolets_per_module: 20,
            tick_interval: Duration::from_secs(1),
            reboot_delay: Duration::from_secs(5),
        }
    }
}

/// Fixed modules occupy ids 1 and 2; generic ones start after them.
const GENERIC_MODULE_ID_OFFSET: usize = 3;

/// A provider-created device with simulated hardware attached.
pub struct MockDevice {
    device: Arc<Device>,
    queue: UpdateSender,
    settings: MockSettings,
}

impl MockDevice {
    /// Populate `device` with modules and iolets and wire every control to
    /// the simulation. Each handler pushes the device onto `queue`.
    #[must_use]
    pub fn attach(device: Arc<Device>, queue: UpdateSender, settings: MockSettings) -> Self {
        let weak = Arc::downgrade(&device);
        register_device_actions(&device, &weak, &queue, settings.reboot_delay);

        device.add_module(fixed_module(
            "1",
            "Video Module",
            (IoletType::IpVideoIn, "Video Input"),
            (IoletType::IpVideoOut, "Video Output"),
        ));
        device.add_module(fixed_module(
            "2",
            "Audio Module",
            (IoletType::IpAudioIn, "Audio Input"),
            (IoletType::IpAudioOut, "Audio Output"),
        ));
        for n in 0..settings.generic_modules {
            device.add_module(generic_module(n, settings.iolets_per_module));
        }

        for module in device.modules() {
            register_module_actions(&module, &weak, &queue);
            for iolet in module.iolets() {
                register_iolet_actions(&iolet, &weak, &queue);
            }
        }

        tracing::debug!(
            device_id = %device.id(),
            modules = device.modules().len(),
            "mock device attached"
        );
        Self {
            device,
            queue,
            settings,
        }
    }

    #[must_use]
    pub fn device(&self) -> &Arc<Device> {
        &self.device
    }

    /// Rename the device to the current wall-clock time and enqueue it.
    pub fn tick(&self) {
        tick(&self.device, &self.queue);
    }

    /// Spawn the periodic clock ticker.
    ///
    /// Returns the `JoinHandle`; abort it to stop ticking.
    #[must_use]
    pub fn start_ticker(&self) -> JoinHandle<()> {
        let device = Arc::clone(&self.device);
        let queue = self.queue.clone();
        let interval = self.settings.tick_interval;
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                if queue.is_closed() {
                    tracing::debug!(device_id = %device.id(), "change queue closed, ticker stopping");
                    break;
                }
                tick(&device, &queue);
            }
        })
    }
}

fn tick(device: &Arc<Device>, queue: &UpdateSender) {
    device.set_name(chrono::Local::now().format("%H:%M:%S").to_string());
    enqueue(device, queue);
}

fn enqueue(device: &Arc<Device>, queue: &UpdateSender) {
    if queue.send(Arc::clone(device)).is_err() {
        tracing::debug!(device_id = %device.id(), "change queue closed, update dropped");
    }
}

fn notify(device: &Weak<Device>, queue: &UpdateSender) {
    if let Some(device) = device.upgrade() {
        enqueue(&device, queue);
    }
}

fn fixed_module(
    id: &str,
    name: &str,
    inputs: (IoletType, &str),
    outputs: (IoletType, &str),
) -> Module {
    let module = Module::new(id, ModuleType::Av, name);
    for n in 1..=4 {
        module.add_iolet(Iolet::new(
            n.to_string(),
            inputs.0,
            format!("{} {n}", inputs.1),
        ));
    }
    for n in 1..=4 {
        module.add_iolet(Iolet::new(
            (n + 4).to_string(),
            outputs.0,
            format!("{} {n}", outputs.1),
        ));
    }
    module
}

fn generic_module(n: usize, iolets: usize) -> Module {
    let module = Module::new(
        (n + GENERIC_MODULE_ID_OFFSET).to_string(),
        ModuleType::Av,
        format!("Mock Module {n}"),
    );
    for i in 0..iolets {
        let iolet = if i % 2 == 0 {
            Iolet::new(i.to_string(), IoletType::IpVideoIn, format!("Video In {i}"))
        } else {
            Iolet::new(i.to_string(), IoletType::IpVideoOut, format!("Video Out {i}"))
        };
        module.add_iolet(iolet);
    }
    module
}

fn register_device_actions(
    device: &Device,
    weak: &Weak<Device>,
    queue: &UpdateSender,
    reboot_delay: Duration,
) {
    let (w, q) = (weak.clone(), queue.clone());
    device.add_action(DeviceControl::Boot, move |device| {
        device.update_status(|status| status.set_online(true));
        notify(&w, &q);
        Ok(())
    });

    let (w, q) = (weak.clone(), queue.clone());
    device.add_action(DeviceControl::Shutdown, move |device| {
        device.update_status(|status| status.set_online(false));
        notify(&w, &q);
        Ok(())
    });

    let (w, q) = (weak.clone(), queue.clone());
    device.add_action(DeviceControl::Reboot, move |device| {
        let runtime = Handle::try_current().map_err(|err| {
            MonikaError::from(DispatchError::Rejected {
                control: DeviceControl::Reboot.to_string(),
                reason: err.to_string(),
            })
        })?;
        device.update_status(|status| status.set_online(false));
        notify(&w, &q);

        let (w, q) = (w.clone(), q.clone());
        runtime.spawn(async move {
            tokio::time::sleep(reboot_delay).await;
            if let Some(device) = w.upgrade() {
                device.update_status(|status| status.set_online(true));
                enqueue(&device, &q);
            }
        });
        Ok(())
    });
}

fn register_module_actions(module: &Module, weak: &Weak<Device>, queue: &UpdateSender) {
    let (w, q) = (weak.clone(), queue.clone());
    module.add_action(ModuleControl::Start, move |module| {
        module.update_status(|status| status.set_ok(true));
        notify(&w, &q);
        Ok(())
    });

    let (w, q) = (weak.clone(), queue.clone());
    module.add_action(ModuleControl::Stop, move |module| {
        module.update_status(|status| status.set_ok(false));
        notify(&w, &q);
        Ok(())
    });
}

fn register_iolet_actions(iolet: &Iolet, weak: &Weak<Device>, queue: &UpdateSender) {
    let (w, q) = (weak.clone(), queue.clone());
    iolet.add_action(IoletControl::Start, move |iolet| {
        iolet.update_status(|status| {
            status.set_running(true);
            status.set_receiving(true);
        });
        notify(&w, &q);
        Ok(())
    });

    let (w, q) = (weak.clone(), queue.clone());
    iolet.add_action(IoletControl::Stop, move |iolet| {
        iolet.update_status(|status| {
            status.set_running(false);
            status.set_receiving(false);
        });
        notify(&w, &q);
        Ok(())
    });
}
