//! Scoped ownership of the promoter facility and session.

use super::{EXIT, Facility, PromoterService, ServiceResult, UNLOAD_MODULE};
use crate::error::{InstallerError, Result};
use log::warn;

/// Holds a loaded promoter facility and, once initialised, an open session.
///
/// [`PromotionSession::release`] closes the session and unloads the
/// facility with status checking. If the guard is dropped without an
/// explicit release, for instance because a call failed part-way, the same
/// steps run best-effort and failures are only logged.
pub struct PromotionSession<'a, S: PromoterService + ?Sized> {
    service: &'a mut S,
    initialized: bool,
    released: bool,
}

impl<'a, S: PromoterService + ?Sized> PromotionSession<'a, S> {
    /// Take ownership of a service whose promoter facility is loaded.
    pub fn new(service: &'a mut S) -> Self {
        Self {
            service,
            initialized: false,
            released: false,
        }
    }

    /// Access the underlying service.
    pub fn service(&mut self) -> &mut S {
        &mut *self.service
    }

    /// Open the promoter session.
    ///
    /// # Errors
    ///
    /// Returns the platform status if initialisation fails.
    pub fn init(&mut self) -> ServiceResult<()> {
        self.service.init()?;
        self.initialized = true;
        Ok(())
    }

    /// Close the session and unload the facility.
    ///
    /// Both steps are attempted even if the first one fails; the first
    /// failure is returned.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::Service`] naming the call that failed.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        let exit = if self.initialized {
            self.service
                .exit()
                .map_err(|code| InstallerError::Service { call: EXIT, code })
        } else {
            Ok(())
        };
        let unload = self
            .service
            .unload_facility(Facility::PromoterUtil)
            .map_err(|code| InstallerError::Service {
                call: UNLOAD_MODULE,
                code,
            });
        exit.and(unload)
    }
}

impl<S: PromoterService + ?Sized> Drop for PromotionSession<'_, S> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if self.initialized {
            if let Err(code) = self.service.exit() {
                warn!("{EXIT} failed during cleanup: 0x{code:08x}");
            }
        }
        if let Err(code) = self.service.unload_facility(Facility::PromoterUtil) {
            warn!("{UNLOAD_MODULE} failed during cleanup: 0x{code:08x}");
        }
    }
}
