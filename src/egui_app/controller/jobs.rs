//! Background job channel and worker threads for the controller.
//!
//! Workers never touch controller state; they send a message and exit. The
//! controller drains the channel on its own thread every frame.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::thread;

use egui::ColorImage;

use crate::caption::generator::{CaptionError, CaptionSource};
use crate::caption::{Caption, CaptionRequest, TemplateId};
use crate::http_client;

const MAX_IMAGE_BYTES: usize = 4 * 1024 * 1024;

pub(super) enum JobMessage {
    CaptionFetched(CaptionFetchResult),
    TemplateImageLoaded(ImageFetchResult),
}

pub(super) struct CaptionFetchResult {
    pub(super) seq: u64,
    pub(super) request: CaptionRequest,
    pub(super) result: Result<Caption, CaptionError>,
}

pub(super) struct ImageFetchResult {
    pub(super) template: TemplateId,
    pub(super) result: Result<Arc<ColorImage>, String>,
}

pub(super) struct ControllerJobs {
    sender: Sender<JobMessage>,
    receiver: Receiver<JobMessage>,
    image_cache: HashMap<TemplateId, Arc<ColorImage>>,
    images_inflight: HashSet<TemplateId>,
}

impl ControllerJobs {
    pub(super) fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver,
            image_cache: HashMap::new(),
            images_inflight: HashSet::new(),
        }
    }

    pub(super) fn try_recv_message(&self) -> Result<JobMessage, TryRecvError> {
        self.receiver.try_recv()
    }

    pub(super) fn spawn_caption_fetch(
        &self,
        seq: u64,
        request: CaptionRequest,
        source: Arc<dyn CaptionSource>,
    ) {
        let sender = self.sender.clone();
        thread::spawn(move || {
            let result = source.generate(&request);
            let _ = sender.send(JobMessage::CaptionFetched(CaptionFetchResult {
                seq,
                request,
                result,
            }));
        });
    }

    /// Return the cached image for `template`, spawning a download when it is
    /// neither cached nor already being fetched.
    pub(super) fn request_template_image(
        &mut self,
        template: TemplateId,
    ) -> Option<Arc<ColorImage>> {
        if let Some(image) = self.image_cache.get(&template) {
            return Some(Arc::clone(image));
        }
        if self.images_inflight.insert(template) {
            let sender = self.sender.clone();
            thread::spawn(move || {
                let result = fetch_template_image(template);
                let _ = sender.send(JobMessage::TemplateImageLoaded(ImageFetchResult {
                    template,
                    result,
                }));
            });
        }
        None
    }

    /// Record a finished image fetch, caching successes.
    pub(super) fn finish_image(
        &mut self,
        template: TemplateId,
        result: &Result<Arc<ColorImage>, String>,
    ) {
        self.images_inflight.remove(&template);
        if let Ok(image) = result {
            self.image_cache.insert(template, Arc::clone(image));
        }
    }

    pub(super) fn images_inflight(&self) -> bool {
        !self.images_inflight.is_empty()
    }
}

fn fetch_template_image(template: TemplateId) -> Result<Arc<ColorImage>, String> {
    let response = http_client::agent()
        .get(template.image_url())
        .call()
        .map_err(|err| err.to_string())?;
    let bytes = http_client::read_response_bytes(response, MAX_IMAGE_BYTES)
        .map_err(|err| err.to_string())?;
    decode_template_image(&bytes)
}

fn decode_template_image(bytes: &[u8]) -> Result<Arc<ColorImage>, String> {
    let image = image::load_from_memory(bytes)
        .map_err(|err| err.to_string())?
        .to_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    Ok(Arc::new(ColorImage::from_rgba_unmultiplied(
        size,
        image.as_raw(),
    )))
}
