use std::ffi::c_void;
use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};
use std::sync::{Arc, Mutex};

use core_foundation::base::TCFType;
use core_foundation::runloop::{kCFRunLoopCommonModes, CFRunLoop, CFRunLoopSource};
use core_foundation_sys::mach_port::CFMachPortRef;
use core_graphics::event::{
    CGEvent, CGEventFlags, CGEventTap, CGEventTapLocation, CGEventTapOptions,
    CGEventTapPlacement, CGEventType, CallbackResult, EventField,
};

use super::keycode::key_code_to_str;
use crate::core::{
    Decision, InputClassifier, KeyMap, ModifierSetting, Modifiers, SessionRequest,
    SharedSessionPhase, TapEvent,
};

extern "C" {
    fn CGEventTapEnable(tap: CFMachPortRef, enable: bool);
}

type RequestSink = Arc<dyn Fn(SessionRequest) + Send + Sync>;

/// System-wide keyboard tap feeding the input classifier.
///
/// The callback only classifies and posts requests through `sink`; all
/// session work happens wherever the sink delivers them.
pub struct SwitcherTap {
    modifier: ModifierSetting,
    session: SharedSessionPhase,
    keys: KeyMap,
    sink: RequestSink,
    tap: Option<InstalledTap>,
}

impl SwitcherTap {
    pub fn new(
        modifier: ModifierSetting,
        session: SharedSessionPhase,
        keys: KeyMap,
        sink: impl Fn(SessionRequest) + Send + Sync + 'static,
    ) -> Self {
        Self {
            modifier,
            session,
            keys,
            sink: Arc::new(sink),
            tap: None,
        }
    }

    /// Install the tap on the current run loop.
    /// Fails when the process lacks Accessibility permission; calling
    /// `start` again after the permission is granted retries.
    pub fn start(&mut self) -> Result<(), String> {
        if self.tap.is_some() {
            return Ok(());
        }
        self.tap = Some(self.create_tap()?);
        tracing::info!("Switcher event tap started");
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.tap.take().is_some() {
            tracing::info!("Switcher event tap stopped");
        }
    }

    fn create_tap(&self) -> Result<InstalledTap, String> {
        let classifier = Mutex::new(InputClassifier::new(
            self.modifier.clone(),
            self.session.clone(),
            self.keys.clone(),
        ));
        let sink = Arc::clone(&self.sink);

        let mach_port_ptr: Arc<AtomicPtr<c_void>> = Arc::new(AtomicPtr::new(ptr::null_mut()));
        let mach_port_for_callback = Arc::clone(&mach_port_ptr);

        let tap = CGEventTap::new(
            CGEventTapLocation::Session,
            CGEventTapPlacement::HeadInsertEventTap,
            CGEventTapOptions::Default,
            vec![
                CGEventType::KeyDown,
                CGEventType::KeyUp,
                CGEventType::FlagsChanged,
            ],
            move |_proxy, event_type, event| {
                let Some(tap_event) = decode_event(event_type, event) else {
                    return CallbackResult::Keep;
                };

                let classification = match classifier.lock() {
                    Ok(mut classifier) => classifier.classify(&tap_event),
                    Err(_) => {
                        tracing::error!("Classifier lock poisoned, passing event through");
                        return CallbackResult::Keep;
                    }
                };

                if classification.reenable_tap {
                    tracing::warn!("Switcher event tap disabled by the system, re-enabling...");
                    let ptr = mach_port_for_callback.load(Ordering::Acquire);
                    if !ptr.is_null() {
                        unsafe {
                            CGEventTapEnable(ptr as CFMachPortRef, true);
                        }
                    }
                }

                if let Some(request) = classification.request {
                    if let TapEvent::KeyDown { key_code, .. } = tap_event {
                        tracing::debug!("{} -> {:?}", key_code_to_str(key_code), request);
                    } else {
                        tracing::debug!("modifier released -> {:?}", request);
                    }
                    sink(request);
                }

                match classification.decision {
                    Decision::Consume => CallbackResult::Drop,
                    Decision::PassThrough => CallbackResult::Keep,
                }
            },
        )
        .map_err(|_| {
            "Failed to create event tap. Make sure Accessibility permission is granted."
                .to_string()
        })?;

        mach_port_ptr.store(
            tap.mach_port().as_concrete_TypeRef() as *mut c_void,
            Ordering::Release,
        );

        tap.enable();

        let source = tap
            .mach_port()
            .create_runloop_source(0)
            .map_err(|_| "Failed to create run loop source for event tap".to_string())?;

        CFRunLoop::get_current().add_source(&source, unsafe { kCFRunLoopCommonModes });

        Ok(InstalledTap { tap, source })
    }
}

struct InstalledTap {
    tap: CGEventTap<'static>,
    source: CFRunLoopSource,
}

impl Drop for InstalledTap {
    fn drop(&mut self) {
        unsafe {
            CGEventTapEnable(
                self.tap.mach_port().as_concrete_TypeRef() as CFMachPortRef,
                false,
            );
        }
        CFRunLoop::get_current().remove_source(&self.source, unsafe { kCFRunLoopCommonModes });
    }
}

fn decode_event(event_type: CGEventType, event: &CGEvent) -> Option<TapEvent> {
    match event_type {
        CGEventType::TapDisabledByTimeout | CGEventType::TapDisabledByUserInput => {
            Some(TapEvent::TapDisabled)
        }
        CGEventType::FlagsChanged => Some(TapEvent::FlagsChanged {
            modifiers: modifiers_from_flags(event.get_flags()),
        }),
        CGEventType::KeyDown => Some(TapEvent::KeyDown {
            key_code: key_code(event),
            modifiers: modifiers_from_flags(event.get_flags()),
        }),
        CGEventType::KeyUp => Some(TapEvent::KeyUp {
            key_code: key_code(event),
        }),
        _ => None,
    }
}

fn key_code(event: &CGEvent) -> u16 {
    event.get_integer_value_field(EventField::KEYBOARD_EVENT_KEYCODE) as u16
}

fn modifiers_from_flags(flags: CGEventFlags) -> Modifiers {
    Modifiers {
        cmd: flags.contains(CGEventFlags::CGEventFlagCommand),
        alt: flags.contains(CGEventFlags::CGEventFlagAlternate),
        ctrl: flags.contains(CGEventFlags::CGEventFlagControl),
        shift: flags.contains(CGEventFlags::CGEventFlagShift),
    }
}
