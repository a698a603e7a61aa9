//! Presentation adapter.
//!
//! Mounts the content surface into one host-provided container at a time and
//! owns the offline placeholder handle.  It makes no lifecycle decisions; the
//! lifecycle tells it what to show.

use log::{debug, info};

use crate::app::ports::ViewPort;
use crate::error::HostError;
use crate::state::SurfaceId;

/// How the surface is presented in the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// Full-screen modal with a "done" affordance.
    Modal,
    /// Pushed onto the host's navigation stack.
    Pushed,
    /// Embedded inside a host view.
    Inline,
}

/// Proof that the offline placeholder is mounted.  At most one exists.
#[derive(Debug, PartialEq, Eq)]
pub struct OfflineOverlayHandle {
    surface: SurfaceId,
}

impl OfflineOverlayHandle {
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }
}

pub struct PresentationAdapter<V: ViewPort> {
    view: V,
    attached: Option<(ContainerKind, SurfaceId)>,
    overlay: Option<OfflineOverlayHandle>,
}

impl<V: ViewPort> PresentationAdapter<V> {
    pub fn new(view: V) -> Self {
        Self {
            view,
            attached: None,
            overlay: None,
        }
    }

    /// Mount `surface` into `container`.  Only one container may hold the
    /// surface at a time; a second attach is rejected until [`detach`](Self::detach).
    pub fn attach(
        &mut self,
        surface: SurfaceId,
        kind: ContainerKind,
        container: V::Container,
    ) -> Result<(), HostError> {
        if let Some((current, _)) = self.attached {
            return Err(HostError::AlreadyAttached(current));
        }
        self.view
            .attach(surface, kind, container)
            .map_err(HostError::Presentation)?;
        info!("Presentation: {} attached ({:?})", surface, kind);
        self.attached = Some((kind, surface));
        if let Some(handle) = self.overlay.as_mut() {
            handle.surface = surface;
            self.view.show_offline_overlay(surface);
            info!("Presentation: offline overlay restored on {}", surface);
        }
        Ok(())
    }

    /// Unmount the surface.  Returns the kind it was presented as.
    ///
    /// A shown placeholder is taken down with the surface but its handle is
    /// kept; the next [`attach`](Self::attach) puts it back.
    pub fn detach(&mut self) -> Option<ContainerKind> {
        let (kind, surface) = self.attached.take()?;
        if self.overlay.is_some() {
            self.view.hide_offline_overlay(surface);
        }
        self.view.detach(surface);
        info!("Presentation: {} detached", surface);
        Some(kind)
    }

    /// Point the container and placeholder at a recreated surface.
    pub fn replace_surface(&mut self, old: SurfaceId, new: SurfaceId) {
        match self.attached.as_mut() {
            Some((_, surface)) if *surface == old => {
                self.view.replace_surface(old, new);
                *surface = new;
            }
            _ => {}
        }
        match self.overlay.as_mut() {
            Some(handle) if handle.surface == old => handle.surface = new,
            _ => {}
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.attached.is_some()
    }

    pub fn attached_kind(&self) -> Option<ContainerKind> {
        self.attached.map(|(kind, _)| kind)
    }

    /// Mount the placeholder over the attached surface.  Returns `true` if it
    /// was newly shown; `false` if it was already up or nothing is attached.
    pub fn show_overlay(&mut self) -> bool {
        if self.overlay.is_some() {
            debug!("Presentation: overlay already shown");
            return false;
        }
        let Some((_, surface)) = self.attached else {
            return false;
        };
        self.view.show_offline_overlay(surface);
        self.overlay = Some(OfflineOverlayHandle { surface });
        info!("Presentation: offline overlay shown on {}", surface);
        true
    }

    /// Remove the placeholder.  Returns `true` if one was shown, including
    /// one held over a detach.
    pub fn dismiss_overlay(&mut self) -> bool {
        let Some(handle) = self.overlay.take() else {
            return false;
        };
        if self.attached.is_some() {
            self.view.hide_offline_overlay(handle.surface);
        }
        info!("Presentation: offline overlay dismissed");
        true
    }

    pub fn overlay(&self) -> Option<&OfflineOverlayHandle> {
        self.overlay.as_ref()
    }

    #[cfg(test)]
    fn view(&self) -> &V {
        &self.view
    }
}
